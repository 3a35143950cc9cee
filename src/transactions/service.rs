use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::guard::ensure_owner,
    error::ApiError,
    pagination::Cursor,
    transactions::{
        dto::{CreateTransactionRequest, UpdateTransactionRequest},
        model::{TransactionView, MAX_AMOUNT},
        repo::{NewTransaction, TransactionChanges, TransactionStore},
    },
    users::repo::UserStore,
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Runs before any store access. Amounts must be positive, fit the 2-digit
/// currency scale, and stay under the column ceiling.
fn validate_amount(amount: Decimal) -> Result<(), ApiError> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::Validation("amount must be positive".into()));
    }
    if amount.normalize().scale() > 2 {
        return Err(ApiError::Validation(
            "amount must have at most 2 decimal places".into(),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(ApiError::Validation("amount exceeds the maximum".into()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// One page of transaction views plus an opaque continuation cursor.
#[derive(Debug)]
pub struct TransactionPageView {
    pub items: Vec<TransactionView>,
    pub next_cursor: Option<String>,
}

/// CRUD over transactions. Every path on an existing resource checks
/// existence first, then that the acting user owns it.
#[derive(Clone)]
pub struct TransactionService {
    users: Arc<dyn UserStore>,
    transactions: Arc<dyn TransactionStore>,
}

impl TransactionService {
    pub fn new(users: Arc<dyn UserStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        Self {
            users,
            transactions,
        }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateTransactionRequest,
    ) -> Result<TransactionView, ApiError> {
        validate_name(&request.name)?;
        validate_amount(request.amount)?;

        self.users
            .find_by_id(owner_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let tx = NewTransaction {
            id: Uuid::new_v4(),
            owner_id,
            name: request.name,
            amount: request.amount,
            occurred_at: request.occurred_at,
            kind: request.kind,
        };
        let created = self.transactions.create(&tx).await?;
        info!(transaction_id = %created.id, owner_id = %owner_id, "transaction created");
        Ok(TransactionView::from(created))
    }

    pub async fn get_by_id(
        &self,
        requester: Uuid,
        id: Uuid,
    ) -> Result<TransactionView, ApiError> {
        let tx = self
            .transactions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;
        ensure_owner(requester, tx.owner_id)?;
        Ok(TransactionView::from(tx))
    }

    /// An empty page is a success, not an error; only a missing user is.
    pub async fn list(
        &self,
        owner_id: Uuid,
        limit: Option<i64>,
        cursor: Option<String>,
    ) -> Result<TransactionPageView, ApiError> {
        let cursor = cursor.as_deref().map(Cursor::decode).transpose()?;
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        self.users
            .find_by_id(owner_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let page = self
            .transactions
            .list_by_owner(owner_id, limit, cursor)
            .await?;
        Ok(TransactionPageView {
            items: page.items.into_iter().map(TransactionView::from).collect(),
            next_cursor: page.next_cursor.map(|c| c.encode()),
        })
    }

    pub async fn update(
        &self,
        requester: Uuid,
        id: Uuid,
        request: UpdateTransactionRequest,
    ) -> Result<TransactionView, ApiError> {
        if let Some(name) = &request.name {
            validate_name(name)?;
        }
        if let Some(amount) = request.amount {
            validate_amount(amount)?;
        }

        let existing = self
            .transactions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;
        ensure_owner(requester, existing.owner_id)?;

        let changes = TransactionChanges {
            name: request.name,
            amount: request.amount,
            occurred_at: request.occurred_at,
            kind: request.kind,
        };
        // A concurrent delete between the fetch and this update surfaces as
        // not-found, never as a partial write.
        let updated = self
            .transactions
            .update(id, &changes)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;
        info!(transaction_id = %id, "transaction updated");
        Ok(TransactionView::from(updated))
    }

    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<TransactionView, ApiError> {
        let existing = self
            .transactions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;
        ensure_owner(requester, existing.owner_id)?;

        let deleted = match self.transactions.delete(id).await? {
            Some(tx) => tx,
            None => {
                warn!(transaction_id = %id, "delete lost the race");
                return Err(ApiError::TransactionNotFound);
            }
        };
        info!(transaction_id = %id, "transaction deleted");
        Ok(TransactionView::from(deleted))
    }
}
