//! Database repositories for the review image pipeline
//!
//! Services depend on the [`ReviewImageStore`] and [`ErrorLogStore`] traits; the
//! Postgres implementations live in [`db`].

pub mod db;
pub mod pool;

pub use db::{ErrorLogRepository, ErrorLogStore, ReviewImageRepository, ReviewImageStore};
pub use pool::{connect_pool, run_migrations};
