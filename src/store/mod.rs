//! Persistence interfaces for accounts and runs
//!
//! Services only see the [`AccountStore`] and [`RunStore`] traits. The
//! PostgreSQL implementations are used by the server; the in-memory ones
//! back the test suite and share the same uniqueness and compare-and-swap
//! guarantees.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Account;
use crate::runs::{Run, RunPatch};

mod memory;
mod postgres;

pub use memory::{InMemoryAccountStore, InMemoryRunStore};
pub use postgres::{PgAccountStore, PgRunStore};

/// Store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record already exists")]
    Duplicate,

    #[error("Record not found")]
    NotFound,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate,
            // A referenced row (the owning account) does not exist
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => StoreError::NotFound,
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

/// Partial account update. `None` leaves the stored value untouched;
/// `updated_at` is always refreshed.
#[derive(Debug, Default, Clone)]
pub struct AccountUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
    pub refresh_token: Option<String>,
}

impl AccountUpdate {
    /// Name changes; blank values are ignored
    pub fn profile(first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            first_name: non_blank(first_name),
            last_name: non_blank(last_name),
            ..Default::default()
        }
    }

    pub fn refresh_token(value: impl Into<String>) -> Self {
        Self {
            refresh_token: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.password_hash.is_none()
            && self.refresh_token.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Credential store: one account per email
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Look up the account whose stored refresh token field equals `token_digest`
    async fn find_by_refresh_token(&self, token_digest: &str)
        -> Result<Option<Account>, StoreError>;

    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// Insert a new account; fails with [`StoreError::Duplicate`] if the email is taken
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;

    /// Apply a partial update and return the post-update record
    async fn update_fields(&self, id: Uuid, update: AccountUpdate)
        -> Result<Account, StoreError>;

    /// Atomically replace the refresh token field, but only if it still holds
    /// `expected`. Returns `None` when the account is gone or the field changed.
    async fn swap_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        replacement: &str,
    ) -> Result<Option<Account>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Half-open creation time window `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && at < self.to
    }
}

/// Run record store, always scoped by account
#[async_trait]
pub trait RunStore: Send + Sync {
    async fn insert(&self, run: &Run) -> Result<(), StoreError>;

    async fn find(&self, account_id: Uuid, run_id: Uuid) -> Result<Option<Run>, StoreError>;

    /// Runs for an account, newest first
    async fn list(
        &self,
        account_id: Uuid,
        window: Option<TimeWindow>,
    ) -> Result<Vec<Run>, StoreError>;

    async fn update_fields(
        &self,
        account_id: Uuid,
        run_id: Uuid,
        patch: RunPatch,
    ) -> Result<Run, StoreError>;

    async fn delete(&self, account_id: Uuid, run_id: Uuid) -> Result<(), StoreError>;

    /// Remove every run of an account, returning how many were deleted
    async fn delete_for_account(&self, account_id: Uuid) -> Result<u64, StoreError>;
}
