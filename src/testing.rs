//! In-memory fakes and fixtures shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{password::hash_password, token::TokenCodec},
    config::JwtConfig,
    pagination::Cursor,
    transactions::{
        model::{Transaction, TransactionKind},
        repo::{NewTransaction, TransactionChanges, TransactionPage, TransactionStore},
    },
    users::{
        model::User,
        repo::{NewUser, UserChanges, UserStore},
    },
};

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret".into(),
        refresh_secret: "test-refresh-secret".into(),
        issuer: "test-issuer".into(),
        audience: "test-aud".into(),
        access_ttl_minutes: 5,
        refresh_ttl_minutes: 60,
    }
}

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(&test_jwt_config())
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    /// Inserts a user the way registration would, returning its id.
    pub async fn seed_user(&self, email: &str, password: &str) -> Uuid {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_lowercase(),
            password_hash: hash_password(password).expect("hash"),
            first_name: "Test".into(),
            last_name: "User".into(),
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.users.lock().unwrap().push(user);
        id
    }

    pub async fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: &NewUser) -> anyhow::Result<User> {
        let now = OffsetDateTime::now_utc();
        let created = User {
            id: user.id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(first_name) = &changes.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            user.last_name = last_name.clone();
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(index) = users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        Ok(Some(users.remove(index)))
    }
}

#[derive(Default)]
pub struct InMemoryTransactionStore {
    transactions: Mutex<Vec<Transaction>>,
}

fn sort_key(tx: &Transaction) -> (OffsetDateTime, Uuid) {
    (tx.occurred_at, tx.id)
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(&self, tx: &NewTransaction) -> anyhow::Result<Transaction> {
        let now = OffsetDateTime::now_utc();
        let created = Transaction {
            id: tx.id,
            owner_id: tx.owner_id,
            name: tx.name.clone(),
            amount: tx.amount,
            occurred_at: tx.occurred_at,
            kind: tx.kind,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.transactions.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Transaction>> {
        let transactions = self.transactions.lock().unwrap();
        Ok(transactions
            .iter()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        cursor: Option<Cursor>,
    ) -> anyhow::Result<TransactionPage> {
        let transactions = self.transactions.lock().unwrap();
        let mut items: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.owner_id == owner_id && t.deleted_at.is_none())
            .filter(|t| match cursor {
                Some(c) => sort_key(t) < (c.occurred_at, c.id),
                None => true,
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));

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
        let mut transactions = self.transactions.lock().unwrap();
        let Some(tx) = transactions
            .iter_mut()
            .find(|t| t.id == id && t.deleted_at.is_none())
        else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            tx.name = name.clone();
        }
        if let Some(amount) = changes.amount {
            tx.amount = amount;
        }
        if let Some(occurred_at) = changes.occurred_at {
            tx.occurred_at = occurred_at;
        }
        if let Some(kind) = changes.kind {
            tx.kind = kind;
        }
        tx.updated_at = OffsetDateTime::now_utc();
        Ok(Some(tx.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Transaction>> {
        let mut transactions = self.transactions.lock().unwrap();
        let Some(tx) = transactions
            .iter_mut()
            .find(|t| t.id == id && t.deleted_at.is_none())
        else {
            return Ok(None);
        };
        tx.deleted_at = Some(OffsetDateTime::now_utc());
        Ok(Some(tx.clone()))
    }

    async fn amounts_by_owner(
        &self,
        owner_id: Uuid,
    ) -> anyhow::Result<Vec<(TransactionKind, Decimal)>> {
        let transactions = self.transactions.lock().unwrap();
        Ok(transactions
            .iter()
            .filter(|t| t.owner_id == owner_id && t.deleted_at.is_none())
            .map(|t| (t.kind, t.amount))
            .collect())
    }
}
