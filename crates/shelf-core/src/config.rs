//! Configuration module
//!
//! Process-wide settings for the upload pipeline: environment, database,
//! upload limits and storage locations. Values come from environment variables
//! (optionally loaded from a `.env` file).

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 2;
const MAX_REQUEST_BODY_MB: usize = 10;
const LOCAL_UPLOAD_PATH: &str = "uploads";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Upper bound for a stored image, checked after compression.
    pub max_upload_size_bytes: usize,
    /// Upper bound for a raw request body; raw images may exceed the stored limit.
    pub max_request_body_bytes: usize,
    pub local_upload_path: String,
    /// Bucket for the cloud backend. It must grant public read through uniform
    /// bucket-level access (`allUsers` as Storage Object Viewer): objects are written
    /// without ACLs and their `storage.googleapis.com` URLs are handed to clients as-is.
    pub gcs_bucket: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// Does not validate; call [`Config::validate`] afterwards.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let max_request_body_mb = lookup("MAX_REQUEST_BODY_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_REQUEST_BODY_MB);

        Ok(Config {
            environment,
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
            local_upload_path: lookup("LOCAL_UPLOAD_PATH")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| LOCAL_UPLOAD_PATH.to_string()),
            gcs_bucket: lookup("GCS_BUCKET").filter(|s| !s.is_empty()),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    /// Backend holding image bytes: the cloud bucket in production, local disk otherwise.
    pub fn storage_backend(&self) -> StorageBackend {
        if self.is_production() {
            StorageBackend::Gcs
        } else {
            StorageBackend::Local
        }
    }

    /// Base URL under which locally stored files are served.
    pub fn local_base_url(&self) -> String {
        format!("http://localhost:{}/uploads", self.server_port)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.max_request_body_bytes < self.max_upload_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_BODY_MB must be at least MAX_UPLOAD_SIZE_MB"
            ));
        }

        if self.is_production() {
            if self.cors_origins.iter().any(|origin| origin == "*") {
                return Err(anyhow::anyhow!(
                    "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
                ));
            }
            if self.gcs_bucket.is_none() {
                return Err(anyhow::anyhow!(
                    "GCS_BUCKET must be set when running in production"
                ));
            }
        }

        Ok(())
    }
}
