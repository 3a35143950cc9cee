use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractor::AuthUser,
    error::ApiError,
    state::AppState,
    users::{dto::UpdateUserRequest, model::PublicUser},
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users/:id",
        get(get_user).patch(update_user).delete(delete_user),
    )
}

#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.users.get_by_id(requester, id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
async fn update_user(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.users.update(requester, id, payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.users.delete(requester, id).await?;
    Ok(Json(user))
}
