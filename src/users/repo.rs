use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::model::User;

/// Fields required to persist a new user. The id is generated by the
/// service, never supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Persistence capabilities the user-facing services need. Not-found is a
/// `None`, errors are reserved for infrastructure failure.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: &NewUser) -> anyhow::Result<User>;
    async fn update(&self, id: Uuid, changes: &UserChanges) -> anyhow::Result<Option<User>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, created_at, updated_at";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: &NewUser) -> anyhow::Result<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> anyhow::Result<Option<User>> {
        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET email = COALESCE($2, email),
                 password_hash = COALESCE($3, password_hash),
                 first_name = COALESCE($4, first_name),
                 last_name = COALESCE($5, last_name),
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .fetch_optional(&self.db)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        // Delete-and-return in one statement; a concurrent delete simply
        // observes None.
        let deleted = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(deleted)
    }
}
