use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Largest accepted amount; matches the NUMERIC(14, 2) column.
pub const MAX_AMOUNT: Decimal = dec!(999_999_999_999.99);

/// How a transaction affects the balance. The stored amount is always
/// positive; the sign is derived from the kind, never from the value.
///
/// Wire values are exact uppercase; anything else is rejected at
/// deserialization, not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Earning,
    Expense,
    Investment,
}

/// Transaction record as stored. Soft-deleted rows keep their data but are
/// invisible to every read path, including the balance aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub occurred_at: OffsetDateTime,
    pub kind: TransactionKind,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

/// Projection of a transaction returned to clients; carries no deletion
/// marker.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
    pub kind: TransactionKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Transaction> for TransactionView {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            name: tx.name,
            amount: tx.amount,
            occurred_at: tx.occurred_at,
            kind: tx.kind,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}
