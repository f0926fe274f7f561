//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::accounts::AccountService;
use crate::auth::AuthService;
use crate::runs::RunService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub account_service: Arc<AccountService>,
    pub run_service: Arc<RunService>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        account_service: Arc<AccountService>,
        run_service: Arc<RunService>,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            run_service,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<AccountService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.account_service.clone()
    }
}

impl FromRef<AppState> for Arc<RunService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.run_service.clone()
    }
}
