//! Account HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthenticatedAccount;
use crate::error::{ApiError, ApiResult};
use crate::models::{AccountResponse, UpdateAccountRequest};
use crate::state::AppState;
use crate::store::AccountUpdate;

fn ensure_access(caller: &AuthenticatedAccount, account_id: Uuid) -> ApiResult<()> {
    if caller.can_access(account_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Access to another account is not allowed".to_string(),
        ))
    }
}

/// GET /v1/account/me - Get the calling account
pub async fn get_current_account(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
) -> ApiResult<Json<AccountResponse>> {
    let account = state.account_service.get(caller.account_id).await?;
    Ok(Json(account))
}

/// GET /v1/account/get/:accountId
pub async fn get_account(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Json<AccountResponse>> {
    ensure_access(&caller, account_id)?;

    let account = state.account_service.get(account_id).await?;
    Ok(Json(account))
}

/// GET /v1/account/fetch - List all accounts (admin)
pub async fn list_accounts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let accounts = state.account_service.list().await?;
    Ok(Json(accounts))
}

/// PUT /v1/account/update - Update names and/or password
pub async fn update_account(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    ensure_access(&caller, req.account_id)?;

    let password = req.password.filter(|p| !p.is_empty());
    let account: AccountResponse = match password {
        // Password and names land in one write
        Some(password) => state
            .auth_service
            .change_password(
                req.account_id,
                &password,
                AccountUpdate::profile(req.first_name, req.last_name),
            )
            .await?
            .into(),
        None => {
            state
                .account_service
                .update_profile(req.account_id, req.first_name, req.last_name)
                .await?
        }
    };

    Ok(Json(account))
}

/// DELETE /v1/account/delete/:accountId
pub async fn delete_account(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Path(account_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_access(&caller, account_id)?;

    state.account_service.delete(account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
