//! Database setup and initialization

use anyhow::Result;
use shelf_core::Config;
use shelf_db::{connect_pool, run_migrations};
use sqlx::PgPool;

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = connect_pool(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
