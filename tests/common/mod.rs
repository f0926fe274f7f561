//! Shared harness for router-level tests over in-memory stores

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use corroyourun_server::accounts::AccountService;
use corroyourun_server::auth::{AuthService, PasswordHasher, TokenConfig, TokenService};
use corroyourun_server::models::{Account, AccountRole};
use corroyourun_server::routes::api_router;
use corroyourun_server::runs::RunService;
use corroyourun_server::state::AppState;
use corroyourun_server::store::{
    AccountStore, InMemoryAccountStore, InMemoryRunStore, RunStore,
};

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub router: Router,
    pub accounts: Arc<dyn AccountStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let accounts: Arc<dyn AccountStore> = Arc::new(InMemoryAccountStore::new());
        let runs: Arc<dyn RunStore> = Arc::new(InMemoryRunStore::new());

        let tokens = Arc::new(TokenService::new(TokenConfig::new("integration-secret")));
        let auth_service = Arc::new(AuthService::new(
            accounts.clone(),
            tokens,
            PasswordHasher::new(4),
        ));
        let account_service = Arc::new(AccountService::new(accounts.clone(), runs.clone()));
        let run_service = Arc::new(RunService::new(runs, accounts.clone()));

        let state = AppState::new(auth_service, account_service, run_service);

        Self {
            router: api_router(state),
            accounts,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Create an account through the API and return its id
    pub async fn signup(&self, email: &str) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/v1/account/create",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": PASSWORD,
                    "firstName": "Ada",
                    "lastName": "Runner",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        body["accountId"].as_str().unwrap().parse().unwrap()
    }

    /// Log in and return (access token, refresh token)
    pub async fn login(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::PUT,
                "/v1/account/login",
                None,
                Some(serde_json::json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        (
            body["token"].as_str().unwrap().to_string(),
            body["refreshToken"].as_str().unwrap().to_string(),
        )
    }

    /// Insert an ADMIN straight into the store; signup only creates USERs
    pub async fn seed_admin(&self, email: &str) -> Uuid {
        let hash = PasswordHasher::new(4).hash(PASSWORD).unwrap();
        let account = Account::new(
            email.to_string(),
            hash,
            "Grace".to_string(),
            "Admin".to_string(),
            AccountRole::Admin,
        );
        self.accounts.insert(&account).await.unwrap();
        account.id
    }
}
