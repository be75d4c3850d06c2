//! Shelf Services Library
//!
//! Orchestration on top of storage, compression and persistence:
//! - `upload`: compress → store → record, and best-effort delete
//! - `reconcile`: out-of-band detection of objects and records that lost their pair

pub mod reconcile;
pub mod upload;

pub use reconcile::{ReconcileReport, ReconcileService};
pub use upload::{ImageFile, UploadService, DELETE_ROUTE};
