//! # Todo Server
//!
//! User accounts with hashed credentials, RS256 bearer tokens and a per-user
//! todo store, served over HTTP/JSON on top of PostgreSQL.
//!
//! ## Architecture
//! The server is organized into modules:
//! - `server`: Router assembly, shared state and the serve loop
//! - `config`: Environment variable configuration management
//! - `auth`: Validation, hashing, token issuance and the auth middleware
//! - `database`: Pool, migrations, repositories and cursors
//! - `services`: Todo use cases
//! - `routes`: HTTP route handlers organized by functionality
//!
//! ## Environment Setup
//! Copy `.env.example` to `.env` and configure:
//! ```bash
//! cp .env.example .env
//! # Point DATABASE_URL and the JWT key paths at real values
//! ```
//!
//! ## Running the Server
//! ```bash
//! cargo run
//! ```
//!
//! The server will start on `http://0.0.0.0:3000` by default.
//!
//! ## Health Check
//! Once running, you can verify the server is operational:
//! ```bash
//! curl http://localhost:3000/health/ready
//! ```

mod auth;
mod config;
mod database;
mod error;
mod routes;
mod server;
mod services;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Application entry point.
///
/// Loads `.env`, initializes tracing (level from `RUST_LOG`, default INFO)
/// and runs the HTTP server until Ctrl-C or SIGTERM.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false) // Don't show module targets for cleaner output
                .compact(),
        )
        .init();

    tracing::info!("🏁 Starting todo server...");
    tracing::info!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "🏗️  Build profile: {}",
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    let config = config::Config::from_env()?;
    if let Err(e) = server::start(config).await {
        tracing::error!(error = ?e, "server exited with error");
        return Err(e);
    }
    Ok(())
}
