pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tubely_api::auth::make_token;
use tubely_api::setup::routes::setup_routes;
use tubely_api::state::AppState;
use tubely_core::models::Video;
use tubely_core::{AppError, Config, StorageBackend};
use tubely_db::VideoRepository;
use tubely_storage::{create_store, DataUrlStore};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

// Small ceilings so oversize tests stay cheap.
pub const TEST_MAX_THUMBNAIL_BYTES: u64 = 64 * 1024;
pub const TEST_MAX_VIDEO_BYTES: u64 = 256 * 1024;

/// In-memory video repository fake.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let mut videos = self.videos.lock().unwrap();
        if !videos.contains_key(&video.id) {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }
        videos.insert(video.id, video.clone());
        Ok(())
    }
}

/// Test application: real router over fakes and tempdir-backed stores.
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryVideoRepository>,
    pub assets_base_url: String,
    pub assets_root: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Mint a bearer token for a user.
    pub fn token_for(&self, user_id: Uuid) -> String {
        make_token(user_id, TEST_JWT_SECRET, Duration::hours(1)).unwrap()
    }

    /// Seed a video record owned by the given user, with no assets yet.
    pub fn insert_video(&self, user_id: Uuid) -> Video {
        let video = Video {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            title: "Test video".to_string(),
            description: "A test video record".to_string(),
            thumbnail_url: None,
            video_url: None,
            user_id,
        };
        self.repo.insert(video.clone());
        video
    }
}

fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        database_url: "postgres://unused".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        thumbnail_backend: StorageBackend::DataUrl,
        video_backend: StorageBackend::Local,
        assets_root: Some(temp_dir.path().to_string_lossy().into_owned()),
        assets_base_url: Some("http://localhost:8091/assets".to_string()),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        max_thumbnail_size_bytes: TEST_MAX_THUMBNAIL_BYTES,
        max_video_size_bytes: TEST_MAX_VIDEO_BYTES,
    }
}

/// Test app with a data-url thumbnail store and a local-disk video store.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config = test_config(&temp_dir);

    let repo = Arc::new(InMemoryVideoRepository::default());
    let video_store = create_store(&config, StorageBackend::Local)
        .await
        .expect("create local video store");

    let assets_base_url = config.assets_base_url.clone().unwrap();
    let assets_root = temp_dir.path().to_path_buf();

    let state = Arc::new(AppState {
        config,
        videos: repo.clone(),
        thumbnail_store: Arc::new(DataUrlStore::new()),
        video_store,
    });

    let server = TestServer::new(setup_routes(state)).expect("start test server");

    TestApp {
        server,
        repo,
        assets_base_url,
        assets_root,
        _temp_dir: temp_dir,
    }
}

/// Test app with the local-disk backend for thumbnails too, for GET-from-disk
/// coverage.
pub async fn setup_test_app_local_thumbnails() -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let mut config = test_config(&temp_dir);
    config.thumbnail_backend = StorageBackend::Local;

    let repo = Arc::new(InMemoryVideoRepository::default());
    let thumbnail_store = create_store(&config, StorageBackend::Local)
        .await
        .expect("create local thumbnail store");
    let video_store = create_store(&config, StorageBackend::Local)
        .await
        .expect("create local video store");

    let assets_base_url = config.assets_base_url.clone().unwrap();
    let assets_root = temp_dir.path().to_path_buf();

    let state = Arc::new(AppState {
        config,
        videos: repo.clone(),
        thumbnail_store,
        video_store,
    });

    let server = TestServer::new(setup_routes(state)).expect("start test server");

    TestApp {
        server,
        repo,
        assets_base_url,
        assets_root,
        _temp_dir: temp_dir,
    }
}
