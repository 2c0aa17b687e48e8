//! # Server Module
//!
//! HTTP server setup and route configuration for the todo server.

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::jwt::TokenSettings;
use crate::auth::{AuthMiddleware, AuthService, TokenIssuer, Validator};
use crate::config::{Config, ServerConfig};
use crate::database::migrations::run_migrations;
use crate::database::todos::PgTodoRepository;
use crate::database::users::PgUserRepository;
use crate::database::{
    DatabaseConfig, DatabaseConnection, HealthCheck, TodoRepository, UserRepository,
};
use crate::routes::{auth, health, todos, users};
use crate::services::TodoService;

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub todos: TodoService,
    pub tokens: Arc<TokenIssuer>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
        tokens: TokenIssuer,
        health: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            auth: AuthService::new(users, Validator::new()),
            todos: TodoService::new(todos),
            tokens: Arc::new(tokens),
            health,
        }
    }
}

/// Assemble every route and layer around `state`.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    // Profile and todo endpoints require a bearer token
    let protected = Router::new()
        .merge(users::create_user_routes())
        .merge(todos::create_todo_routes())
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            AuthMiddleware::validate_token,
        ));

    let app = Router::new()
        .route("/", get(health::home))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .merge(auth::create_auth_routes())
        .merge(protected)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        );

    match cors_layer(&server.allowed_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// CORS for the configured origins, or none when the list is empty.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::ORIGIN,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ])
            .allow_credentials(true),
    )
}

/// Starts the todo HTTP server.
///
/// Connects to PostgreSQL, applies pending migrations, loads the token
/// signing keys and serves until Ctrl-C or SIGTERM.
pub async fn start(config: Config) -> Result<()> {
    let db_config = DatabaseConfig::from_settings(&config.database)?;
    let db = DatabaseConnection::new(db_config).await?;
    run_migrations(db.pool()).await?;

    let stats = db.stats();
    tracing::debug!(size = stats.size, available = stats.available, "database pool ready");

    let (private_pem, public_pem) = config.jwt.read_keys()?;
    let tokens = TokenIssuer::new(&private_pem, &public_pem, TokenSettings::from(&config.jwt))
        .context("Failed to load JWT signing keys")?;

    let state = AppState::new(
        Arc::new(PgUserRepository::new(db.pool().clone())),
        Arc::new(PgTodoRepository::new(db.pool().clone())),
        tokens,
        Arc::new(db.clone()),
    );
    let app = build_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr} - port may already be in use"))?;

    tracing::info!("🚀 Todo server starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🏥 Health checks available at http://{}/health/ready", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
