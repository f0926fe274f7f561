//! Account and authentication routes

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{account, auth};
use crate::middleware::{require_admin, require_user};
use crate::state::AppState;

/// Routes reachable without a token
pub fn public_account_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/account/create", post(auth::signup))
        .route("/v1/account/login", put(auth::login))
        .route("/v1/account/token", put(auth::refresh_token))
}

/// Routes for any signed-in account
pub fn account_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/account/me", get(account::get_current_account))
        .route("/v1/account/get/:account_id", get(account::get_account))
        .route("/v1/account/update", put(account::update_account))
        .route(
            "/v1/account/delete/:account_id",
            delete(account::delete_account),
        )
        .route("/v1/account/logout", put(auth::logout))
        .route_layer(from_fn_with_state(state, require_user))
}

/// Admin-only routes
pub fn admin_account_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/account/fetch", get(account::list_accounts))
        .route_layer(from_fn_with_state(state, require_admin))
}
