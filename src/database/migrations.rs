//! Database Migrations
//!
//! Schema migrations embedded from `migrations/` and applied with refinery.

use anyhow::{Context, Result};
use deadpool_postgres::Pool;

refinery::embed_migrations!("migrations");

/// Run all pending migrations
pub async fn run_migrations(pool: &Pool) -> Result<()> {
    tracing::info!("🔄 Running database migrations...");

    let mut client = pool
        .get()
        .await
        .context("Failed to get connection for migrations")?;
    let client: &mut tokio_postgres::Client = &mut client;

    let report = migrations::runner()
        .run_async(client)
        .await
        .context("Failed to apply migrations")?;

    for migration in report.applied_migrations() {
        tracing::info!("Applied migration {}", migration);
    }
    tracing::info!("✅ Database migrations completed successfully");
    Ok(())
}
