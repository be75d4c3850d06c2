//! Shared application state

use shelf_services::UploadService;
use shelf_storage::StorageBackend;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub upload_service: Arc<UploadService>,
    pub storage_backend: StorageBackend,
}

impl AppState {
    pub fn new(upload_service: Arc<UploadService>) -> Self {
        let storage_backend = upload_service.storage().backend_type();
        Self {
            upload_service,
            storage_backend,
        }
    }
}
