use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractor::AuthUser, balance::service::Balance, error::ApiError, state::AppState,
};

pub fn balance_routes() -> Router<AppState> {
    Router::new().route("/balance", get(get_balance))
}

#[instrument(skip(state))]
async fn get_balance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Balance>, ApiError> {
    let balance = state.balance.compute(user_id).await?;
    Ok(Json(balance))
}
