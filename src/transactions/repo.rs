use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    pagination::Cursor,
    transactions::model::{Transaction, TransactionKind},
};

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub occurred_at: OffsetDateTime,
    pub kind: TransactionKind,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub occurred_at: Option<OffsetDateTime>,
    pub kind: Option<TransactionKind>,
}

/// One page of transactions plus the continuation key, if more remain.
#[derive(Debug)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub next_cursor: Option<Cursor>,
}

/// Persistence capabilities the transaction services need. Soft-deleted rows
/// are invisible to every method here; not-found is a `None`, errors are
/// reserved for infrastructure failure.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn create(&self, tx: &NewTransaction) -> anyhow::Result<Transaction>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Transaction>>;
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        cursor: Option<Cursor>,
    ) -> anyhow::Result<TransactionPage>;
    async fn update(
        &self,
        id: Uuid,
        changes: &TransactionChanges,
    ) -> anyhow::Result<Option<Transaction>>;
    /// Atomic soft-delete-and-return. A concurrent delete of the same row
    /// loses the race and observes `None`; there is no read-then-delete
    /// window.
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Transaction>>;
    /// (kind, amount) of every live transaction of the owner, for the
    /// balance aggregation.
    async fn amounts_by_owner(
        &self,
        owner_id: Uuid,
    ) -> anyhow::Result<Vec<(TransactionKind, Decimal)>>;
}

#[derive(Clone)]
pub struct PgTransactionStore {
    db: PgPool,
}

impl PgTransactionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const TX_COLUMNS: &str =
    "id, owner_id, name, amount, occurred_at, kind, created_at, updated_at, deleted_at";

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn create(&self, tx: &NewTransaction) -> anyhow::Result<Transaction> {
        let created = sqlx::query_as::<_, Transaction>(&format!(
            "INSERT INTO transactions (id, owner_id, name, amount, occurred_at, kind)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TX_COLUMNS}"
        ))
        .bind(tx.id)
        .bind(tx.owner_id)
        .bind(&tx.name)
        .bind(tx.amount)
        .bind(tx.occurred_at)
        .bind(tx.kind)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Transaction>> {
        let tx = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(tx)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        cursor: Option<Cursor>,
    ) -> anyhow::Result<TransactionPage> {
        // Fetch one extra row to learn whether another page exists.
        let mut items = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TX_COLUMNS} FROM transactions
             WHERE owner_id = $1
               AND deleted_at IS NULL
               AND ($2::timestamptz IS NULL OR (occurred_at, id) < ($2::timestamptz, $3::uuid))
             ORDER BY occurred_at DESC, id DESC
             LIMIT $4"
        ))
        .bind(owner_id)
        .bind(cursor.map(|c| c.occurred_at))
        .bind(cursor.map(|c| c.id))
        .bind(limit + 1)
        .fetch_all(&self.db)
        .await?;

        let next_cursor = if items.len() as i64 > limit {
            items.truncate(limit as usize);
            items.last().map(|tx| Cursor {
                occurred_at: tx.occurred_at,
                id: tx.id,
            })
        } else {
            None
        };

        Ok(TransactionPage { items, next_cursor })
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &TransactionChanges,
    ) -> anyhow::Result<Option<Transaction>> {
        let updated = sqlx::query_as::<_, Transaction>(&format!(
            "UPDATE transactions
             SET name = COALESCE($2, name),
                 amount = COALESCE($3, amount),
                 occurred_at = COALESCE($4, occurred_at),
                 kind = COALESCE($5, kind),
                 updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {TX_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(changes.amount)
        .bind(changes.occurred_at)
        .bind(changes.kind)
        .fetch_optional(&self.db)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Transaction>> {
        let deleted = sqlx::query_as::<_, Transaction>(&format!(
            "UPDATE transactions
             SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {TX_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(deleted)
    }

    async fn amounts_by_owner(
        &self,
        owner_id: Uuid,
    ) -> anyhow::Result<Vec<(TransactionKind, Decimal)>> {
        let rows = sqlx::query_as::<_, (TransactionKind, Decimal)>(
            "SELECT kind, amount FROM transactions
             WHERE owner_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
