use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractor::AuthUser,
    error::ApiError,
    state::AppState,
    transactions::{
        dto::{
            CreateTransactionRequest, ListQuery, TransactionPageResponse, UpdateTransactionRequest,
        },
        model::TransactionView,
    },
};

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction).get(list_transactions))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

#[instrument(skip(state, payload))]
async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionView>), ApiError> {
    let view = state.transactions.create(owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip(state))]
async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<TransactionPageResponse>, ApiError> {
    let page = state
        .transactions
        .list(owner_id, query.limit, query.cursor)
        .await?;
    Ok(Json(TransactionPageResponse {
        items: page.items,
        next_cursor: page.next_cursor,
    }))
}

#[instrument(skip(state))]
async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ApiError> {
    let view = state.transactions.get_by_id(requester, id).await?;
    Ok(Json(view))
}

#[instrument(skip(state, payload))]
async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionView>, ApiError> {
    let view = state.transactions.update(requester, id, payload).await?;
    Ok(Json(view))
}

#[instrument(skip(state))]
async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ApiError> {
    let view = state.transactions.delete(requester, id).await?;
    Ok(Json(view))
}
