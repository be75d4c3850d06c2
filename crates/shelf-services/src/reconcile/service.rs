use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use shelf_core::AppError;
use shelf_db::ReviewImageStore;
use shelf_storage::{filename_from_url, DeleteOutcome, Storage};

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub stored_objects: usize,
    pub records: usize,
    /// Stored filenames no record points to
    pub orphaned_objects: Vec<String>,
    /// Record URLs whose object is missing from the backend
    pub dangling_records: Vec<String>,
    pub removed_orphans: usize,
    pub failed_removals: usize,
}

/// Compares the storage backend with the review image records.
///
/// Records are never modified. Uploads still between their store and record steps show
/// up as orphans, so removal should run when no uploads are in flight.
#[derive(Clone)]
pub struct ReconcileService {
    storage: Arc<dyn Storage>,
    images: Arc<dyn ReviewImageStore>,
}

impl ReconcileService {
    pub fn new(storage: Arc<dyn Storage>, images: Arc<dyn ReviewImageStore>) -> Self {
        Self { storage, images }
    }

    #[tracing::instrument(skip(self), fields(backend = %self.storage.backend_type()))]
    pub async fn run(&self, remove_orphans: bool) -> Result<ReconcileReport, AppError> {
        let stored: BTreeSet<String> = self
            .storage
            .list_filenames()
            .await
            .map_err(|e| AppError::FileStorage(format!("Failed to list stored images: {}", e)))?
            .into_iter()
            .collect();

        let urls = self.images.list_urls().await?;
        let referenced: BTreeSet<&str> = urls
            .iter()
            .filter_map(|url| filename_from_url(url))
            .collect();

        let orphaned_objects: Vec<String> = stored
            .iter()
            .filter(|filename| !referenced.contains(filename.as_str()))
            .cloned()
            .collect();

        let dangling_records: Vec<String> = urls
            .iter()
            .filter(|url| match filename_from_url(url) {
                Some(filename) => !stored.contains(filename),
                None => true,
            })
            .cloned()
            .collect();

        let mut report = ReconcileReport {
            stored_objects: stored.len(),
            records: urls.len(),
            orphaned_objects,
            dangling_records,
            ..Default::default()
        };

        if remove_orphans {
            for filename in &report.orphaned_objects {
                match self.storage.delete(filename).await {
                    Ok(DeleteOutcome::Deleted) => report.removed_orphans += 1,
                    Ok(DeleteOutcome::Missing) => {
                        tracing::debug!(filename = %filename, "Orphaned image already gone");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, filename = %filename, "Failed to remove orphaned image");
                        report.failed_removals += 1;
                    }
                }
            }
        }

        tracing::info!(
            stored_objects = report.stored_objects,
            records = report.records,
            orphaned = report.orphaned_objects.len(),
            dangling = report.dangling_records.len(),
            removed = report.removed_orphans,
            failed = report.failed_removals,
            "Reconciliation finished"
        );

        Ok(report)
    }
}
