use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{config::JwtConfig, error::ApiError};

/// Token type used to distinguish access and refresh JWTs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

/// Returned after login, register, or refresh. Neither token is persisted
/// server-side; validity is purely cryptographic plus expiry.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies the two token kinds, each with its own secret and TTL.
#[derive(Clone)]
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::from_secs((config.access_ttl_minutes as u64) * 60),
            refresh_ttl: Duration::from_secs((config.refresh_ttl_minutes as u64) * 60),
        }
    }

    fn sign(&self, user_id: Uuid, kind: TokenKind) -> Result<String, ApiError> {
        let now = OffsetDateTime::now_utc();
        let (ttl, key) = match kind {
            TokenKind::Access => (self.access_ttl, &self.access_encoding),
            TokenKind::Refresh => (self.refresh_ttl, &self.refresh_encoding),
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, key)
            .map_err(|e| ApiError::TokenGeneration(e.to_string()))?;
        debug!(user_id = %user_id, kind = ?kind, "token signed");
        Ok(token)
    }

    /// Signs both tokens or fails as a whole; a partial pair is never
    /// returned.
    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, ApiError> {
        let access_token = self.sign(user_id, TokenKind::Access)?;
        let refresh_token = self.sign(user_id, TokenKind::Refresh)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, ApiError> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => ApiError::ExpiredToken,
            _ => ApiError::InvalidToken,
        })?;
        if data.claims.kind != kind {
            return Err(ApiError::InvalidToken);
        }
        debug!(user_id = %data.claims.sub, kind = ?kind, "token verified");
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, ApiError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, ApiError> {
        self.verify(token, TokenKind::Refresh)
    }
}
