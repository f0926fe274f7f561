//! Run service
//!
//! CRUD over run records. Ownership checks happen in the handlers; this
//! service trusts the account id it is given.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::model::{CreateRunRequest, Run, RunPatch};
use crate::store::{AccountStore, RunStore, StoreError, TimeWindow};

/// Run service errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("Run not found")]
    NotFound,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for RunError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => RunError::NotFound,
            StoreError::Duplicate => RunError::InvalidInput("run already exists".to_string()),
            StoreError::Unavailable(msg) => RunError::StoreUnavailable(msg),
        }
    }
}

#[derive(Clone)]
pub struct RunService {
    store: Arc<dyn RunStore>,
    accounts: Arc<dyn AccountStore>,
}

impl RunService {
    pub fn new(store: Arc<dyn RunStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { store, accounts }
    }

    /// Record a run. The owning account must exist.
    pub async fn create(&self, request: CreateRunRequest) -> Result<Run, RunError> {
        if self.accounts.find_by_id(request.account_id).await?.is_none() {
            return Err(RunError::AccountNotFound);
        }

        let now = Utc::now();
        let run = Run {
            id: Uuid::new_v4(),
            account_id: request.account_id,
            pace: request.pace,
            time: request.time,
            distance: request.distance,
            lap: request.lap,
            incline: request.incline,
            created_at: now,
            updated_at: now,
        };

        // A foreign-key violation means the account vanished after the check
        self.store.insert(&run).await.map_err(|e| match e {
            StoreError::NotFound => RunError::AccountNotFound,
            other => RunError::from(other),
        })?;
        tracing::info!(account_id = %run.account_id, run_id = %run.id, "Run recorded");

        Ok(run)
    }

    pub async fn get(&self, account_id: Uuid, run_id: Uuid) -> Result<Run, RunError> {
        self.store
            .find(account_id, run_id)
            .await?
            .ok_or(RunError::NotFound)
    }

    /// List runs newest first. `date_millis` narrows the listing to the
    /// 24 hours starting at that instant.
    pub async fn list(
        &self,
        account_id: Uuid,
        date_millis: Option<i64>,
    ) -> Result<Vec<Run>, RunError> {
        let window = date_millis.map(day_window).transpose()?;
        Ok(self.store.list(account_id, window).await?)
    }

    pub async fn update(
        &self,
        account_id: Uuid,
        run_id: Uuid,
        patch: RunPatch,
    ) -> Result<Run, RunError> {
        let run = self.store.update_fields(account_id, run_id, patch).await?;
        tracing::info!(account_id = %account_id, run_id = %run_id, "Run updated");
        Ok(run)
    }

    pub async fn delete(&self, account_id: Uuid, run_id: Uuid) -> Result<(), RunError> {
        self.store.delete(account_id, run_id).await?;
        tracing::info!(account_id = %account_id, run_id = %run_id, "Run deleted");
        Ok(())
    }
}

fn day_window(date_millis: i64) -> Result<TimeWindow, RunError> {
    let from = Utc
        .timestamp_millis_opt(date_millis)
        .single()
        .ok_or_else(|| RunError::InvalidInput(format!("invalid date: {}", date_millis)))?;

    let to = from
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| RunError::InvalidInput(format!("invalid date: {}", date_millis)))?;

    Ok(TimeWindow { from, to })
}
