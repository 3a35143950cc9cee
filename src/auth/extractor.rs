use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{auth::token::TokenCodec, error::ApiError};

/// Extracts and validates a bearer access token, yielding the acting user id.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenCodec: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let codec = TokenCodec::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims = codec.verify_access(token).map_err(|e| {
            warn!(code = %e.code(), "access token rejected");
            e
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_codec;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<AuthUser, ApiError> {
        let mut builder = Request::builder().uri("/api/v1/balance");
        if let Some(value) = header {
            builder = builder.header(axum::http::header::AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &test_codec()).await
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let err = extract(Some("Basic dXNlcjpwdw==")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_invalid() {
        let err = extract(Some("Bearer not.a.token")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[tokio::test]
    async fn refresh_token_cannot_act_as_access_token() {
        let pair = test_codec().issue_pair(Uuid::new_v4()).expect("issue pair");
        let header = format!("Bearer {}", pair.refresh_token);
        let err = extract(Some(&header)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[tokio::test]
    async fn valid_access_token_yields_the_user_id() {
        let user_id = Uuid::new_v4();
        let pair = test_codec().issue_pair(user_id).expect("issue pair");
        let header = format!("Bearer {}", pair.access_token);
        let AuthUser(extracted) = extract(Some(&header)).await.expect("extract");
        assert_eq!(extracted, user_id);
    }
}
