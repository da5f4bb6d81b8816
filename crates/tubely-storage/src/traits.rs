//! Storage abstraction trait
//!
//! This module defines the AssetStore trait that all storage backends must
//! implement.

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid asset locator: {0}")]
    InvalidLocator(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A dereferenced asset: the stored bytes plus their media type.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Storage abstraction trait
///
/// All asset backends (data URL, local filesystem, S3) implement this trait,
/// so the upload pipeline never branches on the deployed backend.
///
/// `put` with the same key is create-or-truncate idempotent; concurrent
/// writes to one key are last-write-wins.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist bytes under the suggested key and return the asset locator.
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Persist from an async reader (for large payloads that should not be
    /// buffered by the caller). The reader is consumed until EOF.
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String>;

    /// Dereference a locator previously returned by this store.
    async fn get(&self, locator: &str) -> StorageResult<StoredAsset>;

    /// The storage backend type
    fn backend(&self) -> StorageBackend;
}

/// Reject keys that could escape the backend's root.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
