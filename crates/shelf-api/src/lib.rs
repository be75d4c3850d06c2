//! Shelf API Library
//!
//! HTTP surface for review image uploads: handlers, error rendering and application setup.

pub mod api_doc;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
