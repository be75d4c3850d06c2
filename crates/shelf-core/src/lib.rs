//! Shelf Core Library
//!
//! Domain models, error types and configuration shared by every crate of the
//! review image pipeline.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ErrorLogLevel, MediaType, NewErrorLog, NewReviewImage, Owner, ReviewImage};
pub use storage_types::StorageBackend;
