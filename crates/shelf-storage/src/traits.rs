//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What a delete call found on the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The object existed and was removed
    Deleted,
    /// There was nothing to remove under that filename
    Missing,
}

/// Storage abstraction trait
///
/// Backends are addressed by generated filename only; each backend owns the
/// mapping from filename to its own location (see the crate root documentation).
/// A backend is chosen once at startup and shared as `Arc<dyn Storage>`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under `filename` and return its public URL
    async fn store(&self, filename: &str, content_type: &str, data: Vec<u8>)
        -> StorageResult<String>;

    /// Remove the object stored under `filename`
    ///
    /// A missing object is reported as [`DeleteOutcome::Missing`], not as an error.
    async fn delete(&self, filename: &str) -> StorageResult<DeleteOutcome>;

    /// Check if an object exists
    async fn exists(&self, filename: &str) -> StorageResult<bool>;

    /// List the filenames of every stored image
    async fn list_filenames(&self) -> StorageResult<Vec<String>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
