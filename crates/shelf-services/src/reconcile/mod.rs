mod service;

pub use service::{ReconcileReport, ReconcileService};
