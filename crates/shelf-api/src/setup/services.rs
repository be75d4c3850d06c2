//! Service and repository wiring

use shelf_core::Config;
use shelf_db::{ErrorLogRepository, ReviewImageRepository};
use shelf_processing::Compressor;
use shelf_services::UploadService;
use shelf_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

use crate::state::AppState;

pub fn initialize_services(config: &Config, pool: PgPool, storage: Arc<dyn Storage>) -> Arc<AppState> {
    let images = Arc::new(ReviewImageRepository::new(pool.clone()));
    let error_log = Arc::new(ErrorLogRepository::new(pool));
    let compressor = Compressor::new(config.max_upload_size_bytes);

    tracing::info!(
        max_upload_size_bytes = config.max_upload_size_bytes,
        "Upload service initialized"
    );

    let upload_service = Arc::new(UploadService::new(storage, images, error_log, compressor));
    Arc::new(AppState::new(upload_service))
}
