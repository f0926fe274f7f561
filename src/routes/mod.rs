//! Route definitions for the CorroYouRun API

mod account;
mod run;

use axum::Router;

use crate::middleware::request_tracing;
use crate::state::AppState;

pub use account::{account_routes, admin_account_routes, public_account_routes};
pub use run::run_routes;

/// Assemble every API route group with its gate and the request tracing layer
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(public_account_routes())
        .merge(account_routes(state.clone()))
        .merge(admin_account_routes(state.clone()))
        .merge(run_routes(state.clone()))
        .layer(axum::middleware::from_fn(request_tracing))
        .with_state(state)
}
