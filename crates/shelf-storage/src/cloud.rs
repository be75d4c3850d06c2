use crate::traits::{DeleteOutcome, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::sync::Arc;

/// Folder inside the bucket holding every review image
pub const OBJECT_PREFIX: &str = "review-image";

const PUBLIC_BASE_URL: &str = "https://storage.googleapis.com";

/// Map a stored filename onto its bucket object key
pub fn cloud_object_key(filename: &str) -> String {
    format!("{}/{}", OBJECT_PREFIX, filename)
}

/// Cloud bucket storage implementation
///
/// No per-object ACL is set on upload. The returned URLs only resolve when the bucket
/// uses uniform bucket-level access with public read (`allUsers` as Storage Object
/// Viewer); on a private bucket uploads succeed but the URLs answer 403.
#[derive(Clone)]
pub struct CloudStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl CloudStorage {
    /// Create a Google Cloud Storage backend for `bucket`.
    ///
    /// Credentials are read from the environment (`GOOGLE_SERVICE_ACCOUNT`,
    /// `GOOGLE_APPLICATION_CREDENTIALS` or the metadata server).
    pub fn gcs(bucket: String) -> StorageResult<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), bucket))
    }

    /// Wrap an existing object store, e.g. `object_store::memory::InMemory` in tests.
    pub fn with_store(store: Arc<dyn ObjectStore>, bucket: String) -> Self {
        CloudStorage { store, bucket }
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}/{}", PUBLIC_BASE_URL, self.bucket, key)
    }

    fn location(filename: &str) -> StorageResult<Path> {
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return Err(StorageError::InvalidKey(format!(
                "Filename contains invalid characters: {}",
                filename
            )));
        }
        Ok(Path::from(cloud_object_key(filename)))
    }
}

#[async_trait]
impl Storage for CloudStorage {
    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let location = Self::location(filename)?;
        let key = location.to_string();
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloud storage upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.generate_url(&key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloud storage upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, filename: &str) -> StorageResult<DeleteOutcome> {
        let location = Self::location(filename)?;
        let start = std::time::Instant::now();

        match self.store.head(&location).await {
            Ok(_) => {}
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::warn!(
                    bucket = %self.bucket,
                    key = %location,
                    "Cloud object not found"
                );
                return Ok(DeleteOutcome::Missing);
            }
            Err(e) => return Err(StorageError::DeleteFailed(e.to_string())),
        }

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %location,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloud storage delete successful"
                );
                Ok(DeleteOutcome::Deleted)
            }
            Err(ObjectStoreError::NotFound { .. }) => Ok(DeleteOutcome::Missing),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %location,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloud storage delete failed"
                );
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    async fn exists(&self, filename: &str) -> StorageResult<bool> {
        let location = Self::location(filename)?;
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn list_filenames(&self) -> StorageResult<Vec<String>> {
        let prefix = Path::from(OBJECT_PREFIX);
        let objects: Vec<_> = self
            .store
            .list(Some(&prefix))
            .try_collect()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        let mut filenames: Vec<String> = objects
            .iter()
            .filter_map(|meta| meta.location.filename().map(String::from))
            .collect();
        filenames.sort();
        Ok(filenames)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}
