//! In-memory fakes for the storage, record and error log seams.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use shelf_core::{AppError, NewErrorLog, NewReviewImage, ReviewImage};
use shelf_db::{ErrorLogStore, ReviewImageStore};
use shelf_processing::Compressor;
use shelf_services::{ReconcileService, UploadService};
use shelf_storage::{DeleteOutcome, Storage, StorageBackend, StorageError, StorageResult};
use uuid::Uuid;

pub const BASE_URL: &str = "http://localhost:4000/uploads";
pub const MAX_UPLOAD_SIZE: usize = 2 * 1024 * 1024;

/// Storage fake that counts calls and can be switched into failure mode
#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub store_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub fail_store: AtomicBool,
    pub fail_delete: AtomicBool,
    /// Report every delete as `Missing` without removing anything
    pub vanish_on_delete: AtomicBool,
}

impl MemoryStorage {
    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.objects.lock().unwrap().contains_key(filename)
    }

    pub fn insert(&self, filename: &str, data: Vec<u8>) {
        self.objects
            .lock()
            .unwrap()
            .insert(filename.to_string(), data);
    }

    pub fn remove(&self, filename: &str) {
        self.objects.lock().unwrap().remove(filename);
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn store(
        &self,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("bucket unreachable".to_string()));
        }
        self.insert(filename, data);
        Ok(format!("{}/{}", BASE_URL, filename))
    }

    async fn delete(&self, filename: &str) -> StorageResult<DeleteOutcome> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("bucket unreachable".to_string()));
        }
        if self.vanish_on_delete.load(Ordering::SeqCst) {
            return Ok(DeleteOutcome::Missing);
        }
        match self.objects.lock().unwrap().remove(filename) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::Missing),
        }
    }

    async fn exists(&self, filename: &str) -> StorageResult<bool> {
        Ok(self.contains(filename))
    }

    async fn list_filenames(&self) -> StorageResult<Vec<String>> {
        let mut names: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Record store fake enforcing URL uniqueness like the database does
#[derive(Default)]
pub struct MemoryImageStore {
    pub images: Mutex<HashMap<Uuid, ReviewImage>>,
    pub fail_create: AtomicBool,
}

impl MemoryImageStore {
    pub fn count(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    pub fn seed(&self, id: Uuid, url: &str, owner: shelf_core::Owner) {
        self.images.lock().unwrap().insert(
            id,
            ReviewImage {
                id,
                url: url.to_string(),
                owner,
                created_at: Utc::now(),
            },
        );
    }
}

#[async_trait]
impl ReviewImageStore for MemoryImageStore {
    async fn create(&self, image: NewReviewImage) -> Result<ReviewImage, AppError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset".to_string()));
        }
        let mut images = self.images.lock().unwrap();
        if images.values().any(|existing| existing.url == image.url) {
            return Err(AppError::Conflict("URL already exists!".to_string()));
        }
        let record = ReviewImage {
            id: image.id,
            url: image.url,
            owner: image.owner,
            created_at: Utc::now(),
        };
        images.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewImage>, AppError> {
        Ok(self.images.lock().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.images.lock().unwrap().remove(&id).is_some())
    }

    async fn list_urls(&self) -> Result<Vec<String>, AppError> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .values()
            .map(|image| image.url.clone())
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryErrorLog {
    pub entries: Mutex<Vec<NewErrorLog>>,
    pub fail: AtomicBool,
}

impl MemoryErrorLog {
    pub fn entries(&self) -> Vec<NewErrorLog> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ErrorLogStore for MemoryErrorLog {
    async fn record(&self, entry: NewErrorLog) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal("error log unavailable".to_string()));
        }
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

/// Service wired to fresh fakes, with handles kept for assertions
pub struct TestContext {
    pub storage: Arc<MemoryStorage>,
    pub images: Arc<MemoryImageStore>,
    pub error_log: Arc<MemoryErrorLog>,
    pub service: UploadService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_limit(MAX_UPLOAD_SIZE)
    }

    pub fn with_limit(max_upload_size: usize) -> Self {
        let storage = Arc::new(MemoryStorage::default());
        let images = Arc::new(MemoryImageStore::default());
        let error_log = Arc::new(MemoryErrorLog::default());
        let service = UploadService::new(
            storage.clone(),
            images.clone(),
            error_log.clone(),
            Compressor::new(max_upload_size),
        );

        Self {
            storage,
            images,
            error_log,
            service,
        }
    }

    pub fn reconcile_service(&self) -> ReconcileService {
        ReconcileService::new(self.storage.clone(), self.images.clone())
    }
}

/// Encode a small noisy RGB image in the given format
pub fn sample_image(format: ImageFormat) -> Vec<u8> {
    let mut state: u32 = 0x9e37_79b9;
    let img = ImageBuffer::from_fn(64, 64, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let noise = (state & 0x1f) as u8;
        Rgb([(x * 4) as u8 ^ noise, (y * 4) as u8, noise])
    });

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, format)
        .unwrap();
    buffer.into_inner()
}
