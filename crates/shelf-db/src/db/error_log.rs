//! Error log repository: append-only writes to the error_logs table.

use async_trait::async_trait;
use shelf_core::{AppError, NewErrorLog};
use sqlx::PgPool;

/// Sink for pipeline anomalies that should outlive the process logs
#[async_trait]
pub trait ErrorLogStore: Send + Sync {
    async fn record(&self, entry: NewErrorLog) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct ErrorLogRepository {
    pool: PgPool,
}

impl ErrorLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ErrorLogStore for ErrorLogRepository {
    #[tracing::instrument(skip(self, entry), fields(
        db.table = "error_logs",
        db.operation = "insert",
        level = %entry.level,
        route = %entry.route
    ))]
    async fn record(&self, entry: NewErrorLog) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO error_logs (message, level, route)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&entry.message)
        .bind(entry.level.as_str())
        .bind(&entry.route)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                error = ?e,
                route = %entry.route,
                "Failed to insert error log"
            );
            AppError::Database(e)
        })?;

        Ok(())
    }
}
