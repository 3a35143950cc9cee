use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    auth::{service::AuthService, token::TokenCodec},
    balance::service::BalanceService,
    config::AppConfig,
    transactions::{repo::PgTransactionStore, repo::TransactionStore, service::TransactionService},
    users::{repo::PgUserStore, repo::UserStore, service::UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub tokens: TokenCodec,
    pub auth: AuthService,
    pub users: UserService,
    pub transactions: TransactionService,
    pub balance: BalanceService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> Self {
        let tokens = TokenCodec::new(&config.jwt);
        let user_store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db.clone()));
        let transaction_store: Arc<dyn TransactionStore> =
            Arc::new(PgTransactionStore::new(db.clone()));

        Self {
            db,
            config,
            auth: AuthService::new(user_store.clone(), tokens.clone()),
            users: UserService::new(user_store.clone(), tokens.clone()),
            transactions: TransactionService::new(user_store.clone(), transaction_store.clone()),
            balance: BalanceService::new(user_store, transaction_store),
            tokens,
        }
    }
}

impl FromRef<AppState> for TokenCodec {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
