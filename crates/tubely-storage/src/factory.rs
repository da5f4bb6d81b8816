use crate::DataUrlStore;
#[cfg(feature = "storage-local")]
use crate::LocalDiskStore;
#[cfg(feature = "storage-s3")]
use crate::S3Store;
use crate::{AssetStore, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::{Config, StorageBackend};

/// Create a storage backend from configuration
pub async fn create_store(
    config: &Config,
    backend: StorageBackend,
) -> StorageResult<Arc<dyn AssetStore>> {
    match backend {
        StorageBackend::DataUrl => Ok(Arc::new(DataUrlStore::new())),

        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint.clone();

            let store = S3Store::new(bucket, region, endpoint).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .assets_root
                .clone()
                .ok_or_else(|| StorageError::ConfigError("ASSETS_ROOT not configured".to_string()))?;
            let base_url = config.assets_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("ASSETS_BASE_URL not configured".to_string())
            })?;

            let store = LocalDiskStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
