//! Authentication service
//!
//! Core business logic for password-based authentication: signup, login,
//! refresh token rotation and logout. This is the only writer of an
//! account's password hash and refresh token.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{normalize_email, Account, AccountResponse, AccountRole};
use crate::store::{AccountStore, AccountUpdate, StoreError};

use super::gate::UnauthorizedReason;
use super::jwt::{JwtError, TokenPair, TokenService, TokenType};
use super::password::{PasswordError, PasswordHasher};

/// Stored in place of a refresh token digest once an account logs out.
/// Digests are 64 hex characters, so this can never match one.
pub const LOGGED_OUT: &str = "loggedOut";

/// Auth service errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Account already exists")]
    DuplicateAccount,

    #[error("Account not found")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(JwtError),

    #[error("Unauthorized: {0}")]
    Unauthorized(UnauthorizedReason),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => AuthError::DuplicateAccount,
            StoreError::NotFound => AuthError::NotFound,
            StoreError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

/// Input for account creation
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            store,
            tokens,
            hasher,
        }
    }

    /// Create an account with a hashed password and return it sanitized
    pub async fn signup(&self, input: NewAccount) -> Result<AccountResponse, AuthError> {
        let email = normalize_email(&input.email);

        if self.store.find_by_email(&email).await?.is_some() {
            tracing::debug!("Signup rejected: email already registered");
            return Err(AuthError::DuplicateAccount);
        }

        let password_hash = self.hash_password(input.password).await?;
        let account = Account::new(
            email,
            password_hash,
            input.first_name.trim().to_string(),
            input.last_name.trim().to_string(),
            AccountRole::User,
        );

        // The unique index catches a concurrent signup that passed the check above
        self.store.insert(&account).await?;

        tracing::info!(account_id = %account.id, "Account created");

        Ok(account.into())
    }

    /// Check credentials, issue a token pair and persist the new refresh token
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let account = self
            .store
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::NotFound)?;

        if !self.verify_password(password, &account.password_hash).await? {
            tracing::warn!(account_id = %account.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.issue_pair(&account)?;
        self.store
            .update_fields(
                account.id,
                AccountUpdate::refresh_token(hash_token(&pair.refresh_token)),
            )
            .await?;

        tracing::info!(account_id = %account.id, "Login succeeded");

        Ok(pair)
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The presented token must validate and still be the one stored on the
    /// account. Rotation is a compare-and-swap, so of two concurrent refreshes
    /// with the same token only one succeeds.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .tokens
            .validate(refresh_token)
            .map_err(AuthError::InvalidToken)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidToken(JwtError::Malformed(
                "expected a refresh token".to_string(),
            )));
        }

        let presented = hash_token(refresh_token);
        let account = match self.store.find_by_refresh_token(&presented).await? {
            Some(account) => account,
            None => {
                tracing::warn!(account_id = %claims.sub, "Refresh token is not current");
                return Err(AuthError::NotFound);
            }
        };

        if account.id != claims.sub {
            tracing::warn!(account_id = %account.id, "Refresh token subject mismatch");
            return Err(AuthError::NotFound);
        }

        let pair = self.issue_pair(&account)?;
        let rotated = self
            .store
            .swap_refresh_token(account.id, &presented, &hash_token(&pair.refresh_token))
            .await?;

        if rotated.is_none() {
            tracing::warn!(account_id = %account.id, "Refresh token rotated concurrently");
            return Err(AuthError::NotFound);
        }

        tracing::info!(account_id = %account.id, "Refresh token rotated");

        Ok(pair)
    }

    /// Invalidate the account's stored refresh token
    pub async fn logout(&self, account_id: Uuid) -> Result<(), AuthError> {
        self.store
            .update_fields(account_id, AccountUpdate::refresh_token(LOGGED_OUT))
            .await?;

        tracing::info!(account_id = %account_id, "Logged out");

        Ok(())
    }

    /// Replace the password hash, together with any other fields in
    /// `update`, in a single write. Also logs the account out so that refresh
    /// tokens issued under the old password stop working.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        new_password: &str,
        update: AccountUpdate,
    ) -> Result<Account, AuthError> {
        let password_hash = self.hash_password(new_password.to_string()).await?;
        let account = self
            .store
            .update_fields(
                account_id,
                AccountUpdate {
                    password_hash: Some(password_hash),
                    refresh_token: Some(LOGGED_OUT.to_string()),
                    ..update
                },
            )
            .await?;

        tracing::info!(account_id = %account_id, "Password changed");

        Ok(account)
    }

    /// Token service (for the authorization gate)
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    fn issue_pair(&self, account: &Account) -> Result<TokenPair, AuthError> {
        self.tokens
            .issue_pair(account.id, account.role)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    // bcrypt is deliberately slow; keep it off the async workers.
    async fn hash_password(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, plaintext: &str, hashed: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher;
        let plaintext = plaintext.to_string();
        let hashed = hashed.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hashed))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

/// Hash a token for storage
pub(crate) fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
