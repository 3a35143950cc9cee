use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::RegisterRequest,
        guard::ensure_owner,
        password::hash_password,
        token::{TokenCodec, TokenPair},
    },
    error::ApiError,
    users::{
        dto::UpdateUserRequest,
        model::PublicUser,
        repo::{NewUser, UserChanges, UserStore},
    },
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation("password too short".into()));
    }
    Ok(())
}

/// Registration, lookup, update, and deletion of user accounts. Enforces
/// email uniqueness and strips the password hash from every result.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        Self { users, tokens }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<(PublicUser, TokenPair), ApiError> {
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;
        validate_password(&request.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "registration with taken email");
            return Err(ApiError::EmailAlreadyExists);
        }

        let user = NewUser {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(&request.password)?,
            first_name: request.first_name,
            last_name: request.last_name,
        };
        let created = self.users.create(&user).await?;
        let pair = self.tokens.issue_pair(created.id)?;

        info!(user_id = %created.id, "user registered");
        Ok((PublicUser::from(created), pair))
    }

    pub async fn get_by_id(&self, requester: Uuid, id: Uuid) -> Result<PublicUser, ApiError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        ensure_owner(requester, user.id)?;
        Ok(PublicUser::from(user))
    }

    pub async fn update(
        &self,
        requester: Uuid,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<PublicUser, ApiError> {
        let email = request.email.map(|e| e.trim().to_lowercase());
        if let Some(email) = &email {
            validate_email(email)?;
        }
        if let Some(password) = &request.password {
            validate_password(password)?;
        }

        let existing = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        ensure_owner(requester, existing.id)?;

        if let Some(email) = &email {
            if *email != existing.email {
                if let Some(holder) = self.users.find_by_email(email).await? {
                    if holder.id != existing.id {
                        warn!(user_id = %id, "email change collides with another account");
                        return Err(ApiError::EmailAlreadyExists);
                    }
                }
            }
        }

        let password_hash = match &request.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let changes = UserChanges {
            email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
        };

        let updated = self
            .users
            .update(id, &changes)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        info!(user_id = %id, "user profile updated");
        Ok(PublicUser::from(updated))
    }

    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<PublicUser, ApiError> {
        let existing = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        ensure_owner(requester, existing.id)?;

        let deleted = self
            .users
            .delete(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        info!(user_id = %id, "user deleted");
        Ok(PublicUser::from(deleted))
    }
}
