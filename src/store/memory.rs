//! In-memory stores
//!
//! A single `RwLock` guards each map, so every operation (including the
//! compare-and-swap on refresh tokens) is atomic with respect to the others.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, AccountUpdate, RunStore, StoreError, TimeWindow};
use crate::models::Account;
use crate::runs::{Run, RunPatch};

/// Account store backed by a `HashMap`
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_refresh_token(
        &self,
        token_digest: &str,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.refresh_token.as_deref() == Some(token_digest))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) || accounts.values().any(|a| a.email == account.email)
        {
            return Err(StoreError::Duplicate);
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update_fields(
        &self,
        id: Uuid,
        update: AccountUpdate,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(first_name) = update.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            account.last_name = last_name;
        }
        if let Some(password_hash) = update.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(refresh_token) = update.refresh_token {
            account.refresh_token = Some(refresh_token);
        }
        account.updated_at = Utc::now();

        Ok(account.clone())
    }

    async fn swap_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        replacement: &str,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&id) {
            Some(account) if account.refresh_token.as_deref() == Some(expected) => {
                account.refresh_token = Some(replacement.to_string());
                account.updated_at = Utc::now();
                Ok(Some(account.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.accounts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

/// Run store backed by a `HashMap`
#[derive(Default)]
pub struct InMemoryRunStore {
    runs: RwLock<HashMap<Uuid, Run>>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunStore for InMemoryRunStore {
    async fn insert(&self, run: &Run) -> Result<(), StoreError> {
        let mut runs = self.runs.write().await;
        if runs.contains_key(&run.id) {
            return Err(StoreError::Duplicate);
        }
        runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn find(&self, account_id: Uuid, run_id: Uuid) -> Result<Option<Run>, StoreError> {
        let runs = self.runs.read().await;
        Ok(runs
            .get(&run_id)
            .filter(|r| r.account_id == account_id)
            .cloned())
    }

    async fn list(
        &self,
        account_id: Uuid,
        window: Option<TimeWindow>,
    ) -> Result<Vec<Run>, StoreError> {
        let runs = self.runs.read().await;
        let mut matching: Vec<Run> = runs
            .values()
            .filter(|r| r.account_id == account_id)
            .filter(|r| window.map_or(true, |w| w.contains(r.created_at)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update_fields(
        &self,
        account_id: Uuid,
        run_id: Uuid,
        patch: RunPatch,
    ) -> Result<Run, StoreError> {
        let mut runs = self.runs.write().await;
        let run = runs
            .get_mut(&run_id)
            .filter(|r| r.account_id == account_id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(run);
        Ok(run.clone())
    }

    async fn delete(&self, account_id: Uuid, run_id: Uuid) -> Result<(), StoreError> {
        let mut runs = self.runs.write().await;
        match runs.get(&run_id) {
            Some(run) if run.account_id == account_id => {
                runs.remove(&run_id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn delete_for_account(&self, account_id: Uuid) -> Result<u64, StoreError> {
        let mut runs = self.runs.write().await;
        let before = runs.len();
        runs.retain(|_, r| r.account_id != account_id);
        Ok((before - runs.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountRole;

    fn account(email: &str) -> Account {
        Account::new(
            email.to_string(),
            "hash".to_string(),
            "First".to_string(),
            "Last".to_string(),
            AccountRole::User,
        )
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let store = InMemoryAccountStore::new();
        store.insert(&account("a@x.com")).await.unwrap();

        assert_eq!(
            store.insert(&account("a@x.com")).await,
            Err(StoreError::Duplicate)
        );
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_fields_only_touches_given_fields() {
        let store = InMemoryAccountStore::new();
        let original = account("a@x.com");
        store.insert(&original).await.unwrap();

        let updated = store
            .update_fields(original.id, AccountUpdate::refresh_token("digest"))
            .await
            .unwrap();

        assert_eq!(updated.refresh_token.as_deref(), Some("digest"));
        assert_eq!(updated.first_name, original.first_name);
        assert_eq!(updated.password_hash, original.password_hash);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let store = InMemoryAccountStore::new();
        let result = store
            .update_fields(Uuid::new_v4(), AccountUpdate::refresh_token("x"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_swap_refresh_token_requires_expected_value() {
        let store = InMemoryAccountStore::new();
        let original = account("a@x.com");
        store.insert(&original).await.unwrap();
        store
            .update_fields(original.id, AccountUpdate::refresh_token("first"))
            .await
            .unwrap();

        let swapped = store
            .swap_refresh_token(original.id, "first", "second")
            .await
            .unwrap();
        assert_eq!(
            swapped.and_then(|a| a.refresh_token).as_deref(),
            Some("second")
        );

        // The old value no longer matches, so a second swap loses
        let stale = store
            .swap_refresh_token(original.id, "first", "third")
            .await
            .unwrap();
        assert!(stale.is_none());

        let stored = store.find_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_run_listing_is_scoped_and_newest_first() {
        let store = InMemoryRunStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        for (offset, account_id) in [(2, owner), (1, owner), (0, Uuid::new_v4())] {
            let created_at = now - chrono::Duration::hours(offset);
            store
                .insert(&Run {
                    id: Uuid::new_v4(),
                    account_id,
                    pace: 5.0,
                    time: "00:20:00".to_string(),
                    distance: 4.0,
                    lap: 1,
                    incline: 0.0,
                    created_at,
                    updated_at: created_at,
                })
                .await
                .unwrap();
        }

        let runs = store.list(owner, None).await.unwrap();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].created_at > runs[1].created_at);

        assert_eq!(store.delete_for_account(owner).await.unwrap(), 2);
        assert!(store.list(owner, None).await.unwrap().is_empty());
    }
}
