use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::{
        password::verify_password,
        token::{TokenCodec, TokenPair},
    },
    error::ApiError,
    users::{model::PublicUser, repo::UserStore},
};

/// Validates credentials and issues token pairs.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        Self { users, tokens }
    }

    /// Unknown email and wrong password both fail with `LoginFailed` so the
    /// response never reveals whether an account exists.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(PublicUser, TokenPair), ApiError> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ApiError::LoginFailed)?;

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(ApiError::LoginFailed);
        }

        let pair = self.tokens.issue_pair(user.id)?;
        info!(user_id = %user.id, "user logged in");
        Ok((PublicUser::from(user), pair))
    }

    /// Verifies a refresh token and mints a brand-new pair for its subject.
    ///
    /// The old refresh token stays valid until natural expiry; there is no
    /// server-side revocation store. User existence is not re-checked here,
    /// every authenticated data path does that on its own.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let claims = self
            .tokens
            .verify_refresh(refresh_token)
            .map_err(|_| ApiError::Unauthorized)?;
        let pair = self.tokens.issue_pair(claims.sub)?;
        info!(user_id = %claims.sub, "token pair refreshed");
        Ok(pair)
    }
}
