//! Shelf Storage Library
//!
//! Storage abstraction for review image bytes, with a local filesystem backend for
//! development and a cloud bucket backend for production.
//!
//! # Object naming
//!
//! Callers address objects by generated filename (`{uuid}.{ext}`, see [`keys`]).
//! Each backend maps a filename onto its own layout:
//!
//! - **Local**: `{upload_dir}/{filename}`
//! - **Cloud**: `review-image/{filename}` inside the bucket

#[cfg(feature = "storage-gcs")]
pub mod cloud;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-gcs")]
pub use cloud::{cloud_object_key, CloudStorage};
pub use factory::create_storage;
pub use keys::{extension_for_mime, filename_from_url, generate_filename, GeneratedFilename};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use shelf_core::StorageBackend;
pub use traits::{DeleteOutcome, Storage, StorageError, StorageResult};
