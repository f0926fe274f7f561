//! Authentication middleware
//!
//! Route-layer gates that validate the bearer token before any protected
//! handler runs, and an extractor that hands the established identity to
//! handlers.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{authorize, AccessLevel, AuthenticatedAccount};
use crate::error::ApiError;
use crate::state::AppState;

/// Gate for routes open to USER and ADMIN accounts
pub async fn require_user(State(state): State<AppState>, request: Request, next: Next) -> Response {
    gate(&state, request, next, AccessLevel::User).await
}

/// Gate for routes open to ADMIN accounts only
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    gate(&state, request, next, AccessLevel::Admin).await
}

async fn gate(state: &AppState, mut request: Request, next: Next, level: AccessLevel) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match authorize(state.auth_service.tokens(), header, level) {
        Ok(account) => {
            tracing::debug!(account_id = %account.account_id, role = %account.role, "Request authorized");
            request.extensions_mut().insert(account);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(path = %request.uri().path(), error = %e, "Request refused by gate");
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor for the account established by [`require_user`] / [`require_admin`]
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(caller: AuthenticatedAccount) -> impl IntoResponse {
///     format!("Hello, account {}", caller.account_id)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("request missing token".to_string()))
    }
}
