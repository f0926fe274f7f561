//! Account service
//!
//! Profile operations that do not involve credentials. Password changes and
//! session state go through [`crate::auth::AuthService`].

use std::sync::Arc;

use uuid::Uuid;

use crate::models::AccountResponse;
use crate::store::{AccountStore, AccountUpdate, RunStore, StoreError};

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    runs: Arc<dyn RunStore>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, runs: Arc<dyn RunStore>) -> Self {
        Self { accounts, runs }
    }

    pub async fn get(&self, account_id: Uuid) -> Result<AccountResponse, StoreError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .map(AccountResponse::from)
            .ok_or(StoreError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<AccountResponse>, StoreError> {
        let accounts = self.accounts.list().await?;
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    /// Update first and/or last name. Blank values are ignored.
    pub async fn update_profile(
        &self,
        account_id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<AccountResponse, StoreError> {
        let update = AccountUpdate::profile(first_name, last_name);

        if update.is_empty() {
            return self.get(account_id).await;
        }

        let account = self.accounts.update_fields(account_id, update).await?;
        tracing::info!(account_id = %account_id, "Account profile updated");

        Ok(account.into())
    }

    /// Delete an account together with its runs
    pub async fn delete(&self, account_id: Uuid) -> Result<(), StoreError> {
        if self.accounts.find_by_id(account_id).await?.is_none() {
            return Err(StoreError::NotFound);
        }

        let removed_runs = self.runs.delete_for_account(account_id).await?;
        self.accounts.delete(account_id).await?;

        tracing::info!(account_id = %account_id, removed_runs, "Account deleted");

        Ok(())
    }
}
