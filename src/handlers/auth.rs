//! Authentication HTTP handlers
//!
//! Endpoints for signup, login, token refresh and logout.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{AuthenticatedAccount, NewAccount, TokenPair};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AccountResponse, LoginRequest, LogoutRequest, RefreshTokenRequest, SignupRequest,
    TokenPairResponse,
};
use crate::state::AppState;

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: pair.expires_in,
        }
    }
}

/// POST /v1/account/create - Create an account
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    req.validate()?;

    let account = state
        .auth_service
        .signup(NewAccount {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /v1/account/login - Verify credentials and issue tokens
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    req.validate()?;

    let pair = state.auth_service.login(&req.email, &req.password).await?;

    Ok(Json(pair.into()))
}

/// PUT /v1/account/token - Rotate the refresh token and issue a new pair
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    req.validate()?;

    let pair = state.auth_service.refresh(&req.refresh_token).await?;

    Ok(Json(pair.into()))
}

/// PUT /v1/account/logout - Invalidate the stored refresh token
///
/// Logs out the caller, or with an `accountId` body an admin may log out
/// another account.
pub async fn logout(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<StatusCode> {
    let account_id = body
        .and_then(|Json(req)| req.account_id)
        .unwrap_or(caller.account_id);

    if !caller.can_access(account_id) {
        return Err(ApiError::Forbidden(
            "Cannot log out another account".to_string(),
        ));
    }

    state.auth_service.logout(account_id).await?;

    Ok(StatusCode::OK)
}
