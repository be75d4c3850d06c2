#[cfg(feature = "storage-gcs")]
use crate::CloudStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use shelf_core::Config;
use std::sync::Arc;

/// Create the storage backend for this deployment.
///
/// Called once at startup; production uses the cloud bucket, every other environment
/// writes to the local upload directory.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-gcs")]
        StorageBackend::Gcs => {
            let bucket = config
                .gcs_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("GCS_BUCKET not configured".to_string()))?;

            tracing::info!(
                bucket = %bucket,
                "Cloud storage hands out public object URLs; the bucket must allow public read"
            );
            let storage = CloudStorage::gcs(bucket)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-gcs"))]
        StorageBackend::Gcs => Err(StorageError::ConfigError(
            "GCS storage backend not available (storage-gcs feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage =
                LocalStorage::new(&config.local_upload_path, config.local_base_url()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
