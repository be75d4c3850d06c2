//! Test helpers: wire the router to local storage in a temp dir and in-memory records.
//!
//! No database is needed; the record and error log seams are backed by memory.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::Utc;
use shelf_api::setup::routes;
use shelf_api::AppState;
use shelf_core::{AppError, Config, NewErrorLog, NewReviewImage, ReviewImage};
use shelf_db::{ErrorLogStore, ReviewImageStore};
use shelf_processing::Compressor;
use shelf_services::UploadService;
use shelf_storage::LocalStorage;
use tempfile::TempDir;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryImageStore {
    images: Mutex<HashMap<Uuid, ReviewImage>>,
}

impl MemoryImageStore {
    pub fn count(&self) -> usize {
        self.images.lock().unwrap().len()
    }
}

#[async_trait]
impl ReviewImageStore for MemoryImageStore {
    async fn create(&self, image: NewReviewImage) -> Result<ReviewImage, AppError> {
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
    entries: Mutex<Vec<NewErrorLog>>,
}

impl MemoryErrorLog {
    pub fn entries(&self) -> Vec<NewErrorLog> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ErrorLogStore for MemoryErrorLog {
    async fn record(&self, entry: NewErrorLog) -> Result<(), AppError> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

/// Test application: server plus handles on its backing stores.
pub struct TestApp {
    pub server: TestServer,
    pub images: Arc<MemoryImageStore>,
    pub error_log: Arc<MemoryErrorLog>,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn test_config(upload_dir: &TempDir, max_upload_size_mb: usize) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "postgres://localhost/shelf_test".to_string()),
        (
            "LOCAL_UPLOAD_PATH",
            upload_dir.path().to_string_lossy().into_owned(),
        ),
        ("MAX_UPLOAD_SIZE_MB", max_upload_size_mb.to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub async fn setup_test_app() -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = test_config(&upload_dir, 2);

    let storage = Arc::new(
        LocalStorage::new(&config.local_upload_path, config.local_base_url())
            .await
            .unwrap(),
    );
    let images = Arc::new(MemoryImageStore::default());
    let error_log = Arc::new(MemoryErrorLog::default());

    let upload_service = Arc::new(UploadService::new(
        storage,
        images.clone(),
        error_log.clone(),
        Compressor::new(config.max_upload_size_bytes),
    ));
    let state = Arc::new(AppState::new(upload_service));

    let router = routes::setup_routes(&config, state).await.unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        images,
        error_log,
        upload_dir,
    }
}

/// Multipart body with all three upload fields
pub fn upload_form(data: Vec<u8>, mime: &str, media_type: &str, entity_id: &str) -> MultipartForm {
    MultipartForm::new()
        .add_part(
            "image",
            Part::bytes(data).file_name("cover.png").mime_type(mime),
        )
        .add_text("type", media_type.to_string())
        .add_text("entityId", entity_id.to_string())
}
