//! Review image upload service
//!
//! Upload runs linearly: parse media type → compress → store → record. The store and
//! record steps are not transactional; an object whose record insert failed is logged
//! and left for [`ReconcileService`](crate::ReconcileService).
//!
//! Delete removes the backend object best-effort and always removes the record.

use std::sync::Arc;

use shelf_core::{AppError, MediaType, NewErrorLog, NewReviewImage, Owner, ReviewImage};
use shelf_db::{ErrorLogStore, ReviewImageStore};
use shelf_processing::{CompressedImage, CompressionError, Compressor};
use shelf_storage::{
    filename_from_url, generate_filename, DeleteOutcome, GeneratedFilename, Storage,
    StorageBackend,
};
use uuid::Uuid;

use super::types::ImageFile;

/// Route recorded with error log entries written by [`UploadService::delete`]
pub const DELETE_ROUTE: &str = "UploadService.delete";

/// Upload and delete orchestration for review images
pub struct UploadService {
    storage: Arc<dyn Storage>,
    images: Arc<dyn ReviewImageStore>,
    error_log: Arc<dyn ErrorLogStore>,
    compressor: Compressor,
}

impl UploadService {
    pub fn new(
        storage: Arc<dyn Storage>,
        images: Arc<dyn ReviewImageStore>,
        error_log: Arc<dyn ErrorLogStore>,
        compressor: Compressor,
    ) -> Self {
        Self {
            storage,
            images,
            error_log,
            compressor,
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Compress, store and record an image for the given catalog entity.
    #[tracing::instrument(
        skip(self, file),
        fields(
            original_filename = %file.original_filename,
            content_type = %file.content_type,
            size_bytes = file.data.len(),
            media_type = %media_type,
            entity_id = %entity_id
        )
    )]
    pub async fn upload(
        &self,
        file: ImageFile,
        media_type: &str,
        entity_id: Uuid,
    ) -> Result<ReviewImage, AppError> {
        let media_type: MediaType = media_type.parse()?;
        let owner = Owner::new(media_type, entity_id);

        let compressed = self.compress(file.data, file.content_type).await?;
        let content_type = compressed.kind.mime_type();

        let GeneratedFilename { id, filename } =
            generate_filename(&file.original_filename, content_type);

        let url = self
            .storage
            .store(&filename, content_type, compressed.data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, filename = %filename, "Failed to store image");
                AppError::FileStorage(format!("Failed to store image: {}", e))
            })?;

        tracing::info!(image_id = %id, url = %url, "Image stored");

        let record = NewReviewImage {
            id,
            url: url.clone(),
            owner,
        };

        match self.images.create(record).await {
            Ok(image) => {
                tracing::info!(image_id = %image.id, owner = ?image.owner, "Review image recorded");
                Ok(image)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    image_id = %id,
                    filename = %filename,
                    url = %url,
                    "Stored image has no record; left for reconciliation"
                );
                Err(e)
            }
        }
    }

    /// Delete a review image by id.
    ///
    /// Unknown ids fail with `NotFound` before the backend is touched. A missing object
    /// or a failing backend delete is logged and does not stop the record removal.
    #[tracing::instrument(skip(self), fields(image_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let image = self
            .images
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found!".to_string()))?;

        let filename = filename_from_url(&image.url).ok_or_else(|| {
            AppError::Internal(format!("Stored image URL has no filename: {}", image.url))
        })?;

        match self.storage.delete(filename).await {
            Ok(DeleteOutcome::Deleted) => {}
            Ok(DeleteOutcome::Missing) => {
                let message = match self.storage.backend_type() {
                    StorageBackend::Local => "Local image file not found",
                    StorageBackend::Gcs => "Cloud image object not found",
                };
                tracing::warn!(filename = %filename, url = %image.url, "{}", message);
                self.record_anomaly(format!("{}: {}", message, filename))
                    .await;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    filename = %filename,
                    "Failed to delete stored image; removing record anyway"
                );
                self.record_anomaly(format!("Failed to delete image {}: {}", filename, e))
                    .await;
            }
        }

        if !self.images.delete(id).await? {
            return Err(AppError::NotFound("Image not found!".to_string()));
        }

        tracing::info!(url = %image.url, "Review image deleted");
        Ok(())
    }

    async fn compress(
        &self,
        data: Vec<u8>,
        content_type: String,
    ) -> Result<CompressedImage, AppError> {
        let compressor = self.compressor;
        let max_size = compressor.max_size();

        let compressed = tokio::task::spawn_blocking(move || compressor.compress(data, &content_type))
            .await
            .map_err(|e| AppError::Internal(format!("Compression task failed: {}", e)))?
            .map_err(map_compression_error)?;

        if !compressed.within_limit {
            return Err(AppError::PayloadTooLarge(format!(
                "Image is {} bytes after compression, the limit is {} bytes",
                compressed.size(),
                max_size
            )));
        }

        Ok(compressed)
    }

    async fn record_anomaly(&self, message: String) {
        if let Err(e) = self
            .error_log
            .record(NewErrorLog::warn(message, DELETE_ROUTE))
            .await
        {
            tracing::error!(error = %e, "Failed to write error log entry");
        }
    }
}

fn map_compression_error(err: CompressionError) -> AppError {
    match err {
        CompressionError::UnsupportedFormat(mime) => {
            AppError::BadRequest(format!("Unsupported image format: {}", mime))
        }
        CompressionError::Decode(msg) => AppError::BadRequest(format!("Invalid image file: {}", msg)),
        CompressionError::Encode(msg) => AppError::Internal(format!("Failed to compress image: {}", msg)),
    }
}
