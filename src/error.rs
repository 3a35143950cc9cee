use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Every expected failure the services can report. The boundary layer maps
/// each kind to an HTTP status and a stable machine-readable code; anything
/// wrapped in `Internal` is logged server-side and rendered opaquely.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad credentials. Deliberately covers both unknown email and wrong
    /// password so accounts cannot be enumerated through the login endpoint.
    #[error("invalid email or password")]
    LoginFailed,

    #[error("unauthorized")]
    Unauthorized,

    #[error("token has expired")]
    ExpiredToken,

    /// Signature mismatch, malformed structure, or wrong secret. No further
    /// detail is exposed beyond expired-vs-invalid.
    #[error("invalid token")]
    InvalidToken,

    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error("email is already in use")]
    EmailAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    #[error("transaction not found")]
    TransactionNotFound,

    /// The acting user does not own the resource.
    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    /// A store update reported no affected row without a more specific cause.
    #[error("update affected no rows")]
    UpdateFailed,

    /// A store delete reported no affected row without a more specific cause.
    #[error("delete affected no rows")]
    DeleteFailed,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::LoginFailed => "LOGIN_FAILED",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::ExpiredToken => "EXPIRED_TOKEN",
            ApiError::InvalidToken => "INVALID_TOKEN",
            ApiError::TokenGeneration(_) => "TOKEN_GENERATION",
            ApiError::EmailAlreadyExists => "EMAIL_TAKEN",
            ApiError::UserNotFound => "USER_NOT_FOUND",
            ApiError::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::Validation(_) => "VALIDATION",
            ApiError::UpdateFailed => "UPDATE_FAILED",
            ApiError::DeleteFailed => "DELETE_FAILED",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::LoginFailed
            | ApiError::Unauthorized
            | ApiError::ExpiredToken
            | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::UserNotFound | ApiError::TransactionNotFound => StatusCode::NOT_FOUND,
            ApiError::EmailAlreadyExists => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TokenGeneration(_)
            | ApiError::UpdateFailed
            | ApiError::DeleteFailed
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "internal server error".to_string()
            }
            ApiError::TokenGeneration(detail) => {
                error!(error = %detail, "token generation failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({ "error": { "code": self.code(), "message": message } });
        (self.status(), Json(body)).into_response()
    }
}
