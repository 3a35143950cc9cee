use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    transactions::{model::TransactionKind, repo::TransactionStore},
    users::repo::UserStore,
};

/// Derived totals over a user's live transactions, in exact decimal
/// arithmetic. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub earnings: Decimal,
    pub expenses: Decimal,
    pub investments: Decimal,
    pub balance: Decimal,
}

/// Pure fold over (kind, amount) rows; order-independent, missing kinds
/// stay at zero.
pub fn summarize(rows: &[(TransactionKind, Decimal)]) -> Balance {
    let mut earnings = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut investments = Decimal::ZERO;
    for (kind, amount) in rows.iter().copied() {
        match kind {
            TransactionKind::Earning => earnings += amount,
            TransactionKind::Expense => expenses += amount,
            TransactionKind::Investment => investments += amount,
        }
    }
    Balance {
        earnings,
        expenses,
        investments,
        balance: earnings - expenses + investments,
    }
}

/// Computes the balance of a user on demand.
#[derive(Clone)]
pub struct BalanceService {
    users: Arc<dyn UserStore>,
    transactions: Arc<dyn TransactionStore>,
}

impl BalanceService {
    pub fn new(users: Arc<dyn UserStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        Self {
            users,
            transactions,
        }
    }

    pub async fn compute(&self, user_id: Uuid) -> Result<Balance, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let rows = self.transactions.amounts_by_owner(user_id).await?;
        Ok(summarize(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryTransactionStore, InMemoryUserStore};
    use crate::transactions::repo::NewTransaction;
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;

    #[test]
    fn summarize_signs_by_kind() {
        let rows = vec![
            (TransactionKind::Earning, dec!(100.00)),
            (TransactionKind::Expense, dec!(30.00)),
            (TransactionKind::Investment, dec!(20.00)),
        ];
        let balance = summarize(&rows);
        assert_eq!(balance.earnings, dec!(100.00));
        assert_eq!(balance.expenses, dec!(30.00));
        assert_eq!(balance.investments, dec!(20.00));
        assert_eq!(balance.balance, dec!(90.00));
    }

    #[test]
    fn summarize_is_order_independent() {
        let mut rows = vec![
            (TransactionKind::Expense, dec!(0.10)),
            (TransactionKind::Earning, dec!(0.30)),
            (TransactionKind::Expense, dec!(0.20)),
        ];
        let forward = summarize(&rows);
        rows.reverse();
        assert_eq!(summarize(&rows), forward);
        assert_eq!(forward.balance, Decimal::ZERO);
    }

    #[test]
    fn summarize_of_nothing_is_all_zero() {
        let balance = summarize(&[]);
        assert_eq!(balance.earnings, Decimal::ZERO);
        assert_eq!(balance.expenses, Decimal::ZERO);
        assert_eq!(balance.investments, Decimal::ZERO);
        assert_eq!(balance.balance, Decimal::ZERO);
    }

    #[test]
    fn summarize_keeps_cents_exact() {
        // 0.1 + 0.2 is exactly 0.3 in decimal, unlike floats.
        let rows = vec![
            (TransactionKind::Earning, dec!(0.10)),
            (TransactionKind::Earning, dec!(0.20)),
        ];
        assert_eq!(summarize(&rows).earnings, dec!(0.30));
    }

    async fn seed_tx(
        store: &InMemoryTransactionStore,
        owner_id: uuid::Uuid,
        amount: Decimal,
        kind: TransactionKind,
    ) -> uuid::Uuid {
        let id = uuid::Uuid::new_v4();
        store
            .create(&NewTransaction {
                id,
                owner_id,
                name: "seed".into(),
                amount,
                occurred_at: OffsetDateTime::now_utc(),
                kind,
            })
            .await
            .expect("seed");
        id
    }

    #[tokio::test]
    async fn compute_excludes_soft_deleted_rows() {
        let users = Arc::new(InMemoryUserStore::default());
        let user_id = users.seed_user("ada@example.com", "hunter22hunter").await;
        let transactions = Arc::new(InMemoryTransactionStore::default());

        seed_tx(&transactions, user_id, dec!(100.00), TransactionKind::Earning).await;
        let expense = seed_tx(&transactions, user_id, dec!(30.00), TransactionKind::Expense).await;
        seed_tx(
            &transactions,
            user_id,
            dec!(20.00),
            TransactionKind::Investment,
        )
        .await;

        let service = BalanceService::new(users, transactions.clone());
        assert_eq!(service.compute(user_id).await.unwrap().balance, dec!(90.00));

        transactions.delete(expense).await.expect("soft delete");
        let balance = service.compute(user_id).await.unwrap();
        assert_eq!(balance.expenses, Decimal::ZERO);
        assert_eq!(balance.balance, dec!(120.00));
    }

    #[tokio::test]
    async fn compute_for_missing_user_fails() {
        let users = Arc::new(InMemoryUserStore::default());
        let transactions = Arc::new(InMemoryTransactionStore::default());
        let service = BalanceService::new(users, transactions);

        let err = service.compute(uuid::Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound));
    }

    #[tokio::test]
    async fn compute_with_no_transactions_is_all_zero() {
        let users = Arc::new(InMemoryUserStore::default());
        let user_id = users.seed_user("ada@example.com", "hunter22hunter").await;
        let transactions = Arc::new(InMemoryTransactionStore::default());
        let service = BalanceService::new(users, transactions);

        let balance = service.compute(user_id).await.unwrap();
        assert_eq!(balance.balance, Decimal::ZERO);
    }
}
