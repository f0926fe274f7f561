//! Run record routes

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::run;
use crate::middleware::require_user;
use crate::state::AppState;

/// Create run routes, all behind the user gate
pub fn run_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/run", get(run::get_run))
        .route("/v1/run/create", post(run::create_run))
        .route("/v1/run/fetch/:account_id", get(run::list_runs))
        .route("/v1/run/update", put(run::update_run))
        .route("/v1/run/delete", delete(run::delete_run))
        .route_layer(from_fn_with_state(state, require_user))
}
