//! Data models for CorroYouRun backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod auth;
pub use auth::*;

/// Account record as persisted by the credential store.
///
/// `refresh_token` holds the SHA-256 digest of the most recently issued
/// refresh token, the logged-out sentinel, or nothing if the account never
/// logged in. Neither it nor `password_hash` ever leaves the server; use
/// [`AccountResponse`] for anything sent to clients.
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AccountRole,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh account with a generated id and matching timestamps
    pub fn new(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        role: AccountRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name,
            last_name,
            role,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Account roles, carried as the `group` claim in access tokens
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "account_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    User,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::User => "USER",
            AccountRole::Admin => "ADMIN",
        }
    }

    /// Parse a role claim. Anything other than the exact upper-case names is rejected.
    pub fn from_claim(group: &str) -> Option<Self> {
        match group {
            "USER" => Some(AccountRole::User),
            "ADMIN" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account response (sanitized for API)
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            role: account.role,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
