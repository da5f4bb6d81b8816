//! Application state shared across handlers.

use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_storage::AssetStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    /// Backend for thumbnail assets (data-url, local, or s3).
    pub thumbnail_store: Arc<dyn AssetStore>,
    /// Backend for video assets (local or s3).
    pub video_store: Arc<dyn AssetStore>,
}
