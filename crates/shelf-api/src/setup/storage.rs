//! Storage setup and initialization

use anyhow::{Context, Result};
use shelf_core::Config;
use shelf_storage::{create_storage, Storage};
use std::sync::Arc;

/// Create the backend selected by the environment
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        "Storage initialized successfully"
    );

    Ok(storage)
}
