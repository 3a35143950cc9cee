use serde::Deserialize;

/// JWT settings. Access and refresh tokens are signed with distinct secrets
/// so a refresh token can never pass access-token verification.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            access_secret: std::env::var("JWT_ACCESS_SECRET")?,
            refresh_secret: std::env::var("JWT_REFRESH_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "finledger".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "finledger-users".into()),
            access_ttl_minutes: std::env::var("JWT_ACCESS_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        Ok(Self { database_url, jwt })
    }
}
