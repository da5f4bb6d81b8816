//! Tubely Storage Library
//!
//! Asset storage abstraction and implementations. The [`AssetStore`] trait
//! is the single contract the upload pipeline depends on; the three backends
//! (data URL, local disk, S3) are selected by configuration at startup.
//!
//! # Locator formats
//!
//! Each backend returns a locator a client can dereference later:
//!
//! - **Data URL**: `data:<mediaType>;base64,<payload>` (self-contained)
//! - **Local disk**: `<public base>/<key>` served from the assets root
//! - **S3**: `https://{bucket}.s3.{region}.amazonaws.com/{key}`
//!
//! Keys must not contain `..` or a leading `/`.

pub mod data_url;
pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use data_url::DataUrlStore;
pub use factory::create_store;
#[cfg(feature = "storage-local")]
pub use local::LocalDiskStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3Store;
pub use traits::{AssetStore, StorageError, StorageResult, StoredAsset};
pub use tubely_core::StorageBackend;
