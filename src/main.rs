//! CorroYouRun Backend Server
//!
//! Serves the account, authentication and run record APIs over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use corroyourun_server::accounts::AccountService;
use corroyourun_server::auth::{AuthService, PasswordHasher, TokenService};
use corroyourun_server::config::Config;
use corroyourun_server::db;
use corroyourun_server::routes;
use corroyourun_server::runs::RunService;
use corroyourun_server::state::AppState;
use corroyourun_server::store::{AccountStore, PgAccountStore, PgRunStore, RunStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting CorroYouRun server");

    let db_pool = db::create_pool(&config).await?;
    db::run_migrations(&db_pool).await?;

    let account_store: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(db_pool.clone()));
    let run_store: Arc<dyn RunStore> = Arc::new(PgRunStore::new(db_pool.clone()));

    let token_service = Arc::new(TokenService::new(config.token_config()));
    let auth_service = Arc::new(AuthService::new(
        account_store.clone(),
        token_service,
        PasswordHasher::new(config.bcrypt_cost),
    ));
    let account_service = Arc::new(AccountService::new(account_store.clone(), run_store.clone()));
    let run_service = Arc::new(RunService::new(run_store, account_store));

    let app_state = AppState::new(auth_service, account_service, run_service);

    let app = Router::new()
        .route("/health", get(health_check))
        .with_state(db_pool)
        .merge(routes::api_router(app_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(configure_cors(&config)),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    database: String,
    version: &'static str,
}

/// GET /health - Liveness plus database connectivity
async fn health_check(State(pool): State<PgPool>) -> Json<HealthResponse> {
    let (status, database) = match db::check_health(&pool).await {
        Ok(()) => ("healthy", "connected".to_string()),
        Err(e) => ("unhealthy", e.to_string()),
    };

    Json(HealthResponse {
        status,
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
