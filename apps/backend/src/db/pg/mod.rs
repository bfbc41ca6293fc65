use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

/// Create a PostgreSQL connection pool and run migrations
pub async fn create_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = connect(&config.url(), config.max_connections).await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    log::info!("Running PostgreSQL migrations...");
    sqlx::migrate!("./src/db/pg/migrations")
        .run(pool)
        .await
        .context("Failed to run PostgreSQL migrations")?;
    log::info!("PostgreSQL migrations complete");
    Ok(())
}
