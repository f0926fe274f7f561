//! Run record HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthenticatedAccount;
use crate::error::{ApiError, ApiResult};
use crate::runs::{CreateRunRequest, Run, RunFetchQuery, RunKey, UpdateRunRequest};
use crate::state::AppState;

fn ensure_owner(caller: &AuthenticatedAccount, account_id: Uuid) -> ApiResult<()> {
    if caller.can_access(account_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Runs of another account are not accessible".to_string(),
        ))
    }
}

/// POST /v1/run/create
pub async fn create_run(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<(StatusCode, Json<Run>)> {
    req.validate_run()?;
    ensure_owner(&caller, req.account_id)?;

    let run = state.run_service.create(req).await?;
    Ok((StatusCode::CREATED, Json(run)))
}

/// GET /v1/run?accountId=..&runId=..
pub async fn get_run(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Query(key): Query<RunKey>,
) -> ApiResult<Json<Run>> {
    ensure_owner(&caller, key.account_id)?;

    let run = state.run_service.get(key.account_id, key.run_id).await?;
    Ok(Json(run))
}

/// GET /v1/run/fetch/:accountId?date=..
pub async fn list_runs(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Path(account_id): Path<Uuid>,
    Query(query): Query<RunFetchQuery>,
) -> ApiResult<Json<Vec<Run>>> {
    ensure_owner(&caller, account_id)?;

    let runs = state.run_service.list(account_id, query.date).await?;
    Ok(Json(runs))
}

/// PUT /v1/run/update
pub async fn update_run(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Json(req): Json<UpdateRunRequest>,
) -> ApiResult<Json<Run>> {
    req.validate_run()?;
    ensure_owner(&caller, req.account_id)?;

    let (account_id, run_id) = (req.account_id, req.run_id);
    let run = state
        .run_service
        .update(account_id, run_id, req.into_patch())
        .await?;
    Ok(Json(run))
}

/// DELETE /v1/run/delete
pub async fn delete_run(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Json(key): Json<RunKey>,
) -> ApiResult<StatusCode> {
    ensure_owner(&caller, key.account_id)?;

    state.run_service.delete(key.account_id, key.run_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
