use crate::traits::{DeleteOutcome, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Upload directory, created if missing (e.g., "uploads")
    /// * `base_url` - Base URL the directory is served under (e.g., "http://localhost:4000/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Resolve a filename inside the upload directory.
    ///
    /// Only flat filenames are accepted; anything that could leave the directory is rejected.
    fn filename_to_path(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Filename contains invalid characters: {}",
                filename
            )));
        }

        Ok(self.base_path.join(filename))
    }

    fn generate_url(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), filename)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(
        &self,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let path = self.filename_to_path(filename)?;
        let size = data.len();
        let start = std::time::Instant::now();

        // Written beside the target and renamed into place, so a failed write never
        // leaves a truncated image under its final name.
        let partial = self.base_path.join(format!(".{}.partial", filename));

        let written = match write_file(&partial, &data).await {
            Ok(()) => fs::rename(&partial, &path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&partial).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        error = %cleanup,
                        path = %partial.display(),
                        "Failed to remove partial upload"
                    );
                }
            }
            return Err(StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        let url = self.generate_url(filename);

        tracing::info!(
            path = %path.display(),
            filename = %filename,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, filename: &str) -> StorageResult<DeleteOutcome> {
        let path = self.filename_to_path(filename)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            tracing::warn!(
                path = %path.display(),
                filename = %filename,
                "Local image file not found"
            );
            return Ok(DeleteOutcome::Missing);
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            filename = %filename,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(DeleteOutcome::Deleted)
    }

    async fn exists(&self, filename: &str) -> StorageResult<bool> {
        let path = self.filename_to_path(filename)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn list_filenames(&self) -> StorageResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut filenames = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                // In-progress writes
                Some(name) if name.starts_with('.') => {}
                Some(name) => filenames.push(name.to_string()),
                None => {}
            }
        }

        filenames.sort();
        Ok(filenames)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}
