//! Configuration module
//!
//! Env-based configuration for the API service: server, database, auth,
//! storage backends, and upload ceilings. Storage backend selection is a
//! deployment decision made here, never a runtime branch in handlers.

use std::env;
use std::str::FromStr;

use crate::constants::{DEFAULT_MAX_THUMBNAIL_BYTES, DEFAULT_MAX_VIDEO_BYTES};
use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 8091;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub database_url: String,
    pub jwt_secret: String,
    /// Backend used for thumbnail assets (`data-url`, `local`, or `s3`).
    pub thumbnail_backend: StorageBackend,
    /// Backend used for video assets (`local` or `s3`; data URLs are never
    /// video-class).
    pub video_backend: StorageBackend,
    // Local disk backend
    pub assets_root: Option<String>,
    pub assets_base_url: Option<String>,
    // S3 backend
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    // Upload ceilings (hard caps enforced at the transport layer)
    pub max_thumbnail_size_bytes: u64,
    pub max_video_size_bytes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Load .env if present; real env vars take precedence.
        dotenvy::dotenv().ok();

        let server_port = env_parse("SERVER_PORT", DEFAULT_SERVER_PORT)?;
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let thumbnail_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => StorageBackend::from_str(&s)?,
            Err(_) => StorageBackend::Local,
        };
        let video_backend = match env::var("VIDEO_STORAGE_BACKEND") {
            Ok(s) => StorageBackend::from_str(&s)?,
            Err(_) => StorageBackend::S3,
        };

        let config = Config {
            server_port,
            environment,
            database_url,
            jwt_secret,
            thumbnail_backend,
            video_backend,
            assets_root: env::var("ASSETS_ROOT").ok(),
            assets_base_url: env::var("ASSETS_BASE_URL").ok(),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or(env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            max_thumbnail_size_bytes: env_parse(
                "MAX_THUMBNAIL_SIZE_BYTES",
                DEFAULT_MAX_THUMBNAIL_BYTES,
            )?,
            max_video_size_bytes: env_parse("MAX_VIDEO_SIZE_BYTES", DEFAULT_MAX_VIDEO_BYTES)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        if self.video_backend == StorageBackend::DataUrl {
            anyhow::bail!("VIDEO_STORAGE_BACKEND must be 'local' or 's3'; data URLs cannot hold video-class payloads");
        }
        for backend in [self.thumbnail_backend, self.video_backend] {
            match backend {
                StorageBackend::Local => {
                    if self.assets_root.is_none() || self.assets_base_url.is_none() {
                        anyhow::bail!(
                            "ASSETS_ROOT and ASSETS_BASE_URL must be set for the local backend"
                        );
                    }
                }
                StorageBackend::S3 => {
                    if self.s3_bucket.is_none() || self.s3_region.is_none() {
                        anyhow::bail!("S3_BUCKET and S3_REGION must be set for the s3 backend");
                    }
                }
                StorageBackend::DataUrl => {}
            }
        }
        if self.max_thumbnail_size_bytes == 0 || self.max_video_size_bytes == 0 {
            anyhow::bail!("Upload size ceilings must be greater than zero");
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
