// Database Connection Management
//
// Handles PostgreSQL connection pooling using tokio-postgres and deadpool.
use anyhow::{Context, Result};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Timeouts};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::str::FromStr;
use std::time::Duration;
use tokio_postgres::NoTls;

use crate::config::DatabaseSettings;
use crate::database::error::StorageError;
use crate::database::repository::HealthCheck;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub pg: tokio_postgres::Config,
    pub ssl: bool,
    pub max_size: usize,
    pub timeouts: Timeouts,
}

impl DatabaseConfig {
    /// Build the pool configuration from the application settings
    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self> {
        let pg = tokio_postgres::Config::from_str(&settings.url)
            .context("Failed to parse DATABASE_URL")?;

        Ok(Self {
            pg,
            ssl: settings.ssl,
            max_size: settings.max_connections,
            timeouts: Timeouts {
                wait: Some(Duration::from_secs(30)),
                create: Some(Duration::from_secs(30)),
                recycle: Some(Duration::from_secs(30)),
            },
        })
    }

    /// host:port/dbname, never the credentials
    fn masked(&self) -> String {
        let host = self
            .pg
            .get_hosts()
            .first()
            .map(|h| match h {
                tokio_postgres::config::Host::Tcp(s) => s.clone(),
                tokio_postgres::config::Host::Unix(s) => s.to_string_lossy().to_string(),
            })
            .unwrap_or_default();
        let port = self.pg.get_ports().first().copied().unwrap_or(5432);
        let dbname = self.pg.get_dbname().unwrap_or_default();
        format!("{host}:{port}/{dbname}")
    }
}

/// Database connection wrapper
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: Pool,
}

impl DatabaseConnection {
    /// Create a new database connection with the provided configuration
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        tracing::info!("🔌 Connecting to database: {}", config.masked());

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = if config.ssl {
            let tls_connector = TlsConnector::builder()
                .build()
                .context("Failed to build TLS connector")?;
            Manager::from_config(config.pg.clone(), MakeTlsConnector::new(tls_connector), mgr_config)
        } else {
            Manager::from_config(config.pg.clone(), NoTls, mgr_config)
        };

        let pool = Pool::builder(mgr)
            .max_size(config.max_size)
            .wait_timeout(config.timeouts.wait)
            .create_timeout(config.timeouts.create)
            .recycle_timeout(config.timeouts.recycle)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .context("Failed to create database pool")?;

        let client = pool
            .get()
            .await
            .context("Failed to get connection from pool")?;
        client
            .query("SELECT 1", &[])
            .await
            .context("Failed to test database connection")?;

        tracing::info!("✅ Database connection established successfully");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Get database connection statistics
    pub fn stats(&self) -> ConnectionStats {
        let status = self.pool.status();
        ConnectionStats {
            size: status.size,
            available: status.available,
        }
    }
}

#[async_trait]
impl HealthCheck for DatabaseConnection {
    async fn health_check(&self) -> Result<(), StorageError> {
        let client = self.pool.get().await?;
        client
            .query("SELECT 1", &[])
            .await
            .map_err(|e| StorageError::query("SELECT 1", e))?;
        Ok(())
    }
}

/// Database connection statistics
#[derive(Debug)]
pub struct ConnectionStats {
    pub size: usize,
    pub available: usize,
}
