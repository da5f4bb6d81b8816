//! Data URL backend.
//!
//! Assets are embedded directly into their locator as
//! `data:<mediaType>;base64,<payload>`, so no bytes live outside the record
//! that references them. Suited to small thumbnails only.

use crate::traits::{AssetStore, StorageError, StorageResult, StoredAsset};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};
use tubely_core::StorageBackend;

/// Encode bytes into a `data:` URL with a standard base64 payload.
pub fn encode_data_url(content_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, BASE64.encode(data))
}

/// Decode a `data:` URL produced by [`encode_data_url`].
///
/// Only the `data:<mediaType>;base64,<payload>` shape is accepted; URL-encoded
/// payloads and parameterized media types are rejected.
pub fn decode_data_url(locator: &str) -> StorageResult<StoredAsset> {
    let rest = locator
        .strip_prefix("data:")
        .ok_or_else(|| StorageError::InvalidLocator("missing data: prefix".to_string()))?;

    let (content_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| StorageError::InvalidLocator("missing ;base64, marker".to_string()))?;

    if content_type.is_empty() {
        return Err(StorageError::InvalidLocator(
            "empty media type".to_string(),
        ));
    }

    let data = BASE64
        .decode(payload)
        .map_err(|e| StorageError::InvalidLocator(format!("invalid base64 payload: {}", e)))?;

    Ok(StoredAsset {
        content_type: content_type.to_string(),
        data,
    })
}

/// Storage backend that embeds assets into their locator.
#[derive(Clone, Default)]
pub struct DataUrlStore;

impl DataUrlStore {
    pub fn new() -> Self {
        DataUrlStore
    }
}

#[async_trait]
impl AssetStore for DataUrlStore {
    async fn put(&self, _key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String> {
        let size = data.len();
        let locator = encode_data_url(content_type, &data);

        tracing::info!(
            content_type = %content_type,
            size_bytes = size,
            "Data URL encode successful"
        );

        Ok(locator)
    }

    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to read stream: {}", e)))?;

        self.put(key, content_type, data).await
    }

    async fn get(&self, locator: &str) -> StorageResult<StoredAsset> {
        decode_data_url(locator)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::DataUrl
    }
}
