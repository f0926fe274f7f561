//! PostgreSQL stores
//!
//! Email uniqueness is enforced by a unique index (see `migrations/`), and
//! refresh token rotation is a single conditional `UPDATE`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccountStore, AccountUpdate, RunStore, StoreError, TimeWindow};
use crate::models::Account;
use crate::runs::{Run, RunPatch};

const ACCOUNT_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, refresh_token, created_at, updated_at";

const RUN_COLUMNS: &str =
    "id, account_id, pace, run_time, distance, lap, incline, created_at, updated_at";

/// Account store on the `accounts` table
#[derive(Clone)]
pub struct PgAccountStore {
    db_pool: PgPool,
}

impl PgAccountStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE email = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(account)
    }

    async fn find_by_refresh_token(
        &self,
        token_digest: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE refresh_token = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(token_digest)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(account)
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = sqlx::query_as(&format!(
            "SELECT {} FROM accounts ORDER BY created_at ASC",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(accounts)
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, first_name, last_name, role, refresh_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.role)
        .bind(&account.refresh_token)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    async fn update_fields(
        &self,
        id: Uuid,
        update: AccountUpdate,
    ) -> Result<Account, StoreError> {
        sqlx::query_as(&format!(
            r#"
            UPDATE accounts
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                password_hash = COALESCE($4, password_hash),
                refresh_token = COALESCE($5, refresh_token),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.password_hash)
        .bind(update.refresh_token)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn swap_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        replacement: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as(&format!(
            r#"
            UPDATE accounts
            SET refresh_token = $3, updated_at = NOW()
            WHERE id = $1 AND refresh_token = $2
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .bind(expected)
        .bind(replacement)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let rows_affected = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

/// Run store on the `runs` table
#[derive(Clone)]
pub struct PgRunStore {
    db_pool: PgPool,
}

impl PgRunStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RunStore for PgRunStore {
    async fn insert(&self, run: &Run) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO runs (id, account_id, pace, run_time, distance, lap, incline, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(run.id)
        .bind(run.account_id)
        .bind(run.pace)
        .bind(&run.time)
        .bind(run.distance)
        .bind(run.lap)
        .bind(run.incline)
        .bind(run.created_at)
        .bind(run.updated_at)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    async fn find(&self, account_id: Uuid, run_id: Uuid) -> Result<Option<Run>, StoreError> {
        let run = sqlx::query_as(&format!(
            "SELECT {} FROM runs WHERE id = $1 AND account_id = $2",
            RUN_COLUMNS
        ))
        .bind(run_id)
        .bind(account_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(run)
    }

    async fn list(
        &self,
        account_id: Uuid,
        window: Option<TimeWindow>,
    ) -> Result<Vec<Run>, StoreError> {
        let runs = match window {
            Some(window) => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {} FROM runs
                    WHERE account_id = $1 AND created_at >= $2 AND created_at < $3
                    ORDER BY created_at DESC
                    "#,
                    RUN_COLUMNS
                ))
                .bind(account_id)
                .bind(window.from)
                .bind(window.to)
                .fetch_all(&self.db_pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM runs WHERE account_id = $1 ORDER BY created_at DESC",
                    RUN_COLUMNS
                ))
                .bind(account_id)
                .fetch_all(&self.db_pool)
                .await?
            }
        };

        Ok(runs)
    }

    async fn update_fields(
        &self,
        account_id: Uuid,
        run_id: Uuid,
        patch: RunPatch,
    ) -> Result<Run, StoreError> {
        sqlx::query_as(&format!(
            r#"
            UPDATE runs
            SET pace = COALESCE($3, pace),
                run_time = COALESCE($4, run_time),
                distance = COALESCE($5, distance),
                lap = COALESCE($6, lap),
                incline = COALESCE($7, incline),
                updated_at = NOW()
            WHERE id = $1 AND account_id = $2
            RETURNING {}
            "#,
            RUN_COLUMNS
        ))
        .bind(run_id)
        .bind(account_id)
        .bind(patch.pace)
        .bind(patch.time)
        .bind(patch.distance)
        .bind(patch.lap)
        .bind(patch.incline)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, account_id: Uuid, run_id: Uuid) -> Result<(), StoreError> {
        let rows_affected = sqlx::query("DELETE FROM runs WHERE id = $1 AND account_id = $2")
            .bind(run_id)
            .bind(account_id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete_for_account(&self, account_id: Uuid) -> Result<u64, StoreError> {
        let rows_affected = sqlx::query("DELETE FROM runs WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
