//! Upload orchestration
//!
//! Drives the full ingestion sequence for one request: record fetch, ownership
//! check, temp-file staging, magic-byte validation, storage write, and record
//! update. No step is retried; a failure at any point is terminal for the
//! request and earlier side effects are limited to the staged temp file
//! (removed on drop) and, after a successful store write, a possible orphaned
//! stored object that the record never references.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use rand::RngCore;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_media::{detect_content_type, extension_for, StagedUpload, StagingSink};
use tubely_storage::StoredAsset;
use uuid::Uuid;

use crate::error::{staging_error_to_app, storage_error_to_app};
use crate::state::AppState;

/// Check that the authenticated principal owns the video record.
///
/// Pure comparison; runs after the record fetch and before any staging or
/// storage side effect.
pub fn authorize_owner(video: &Video, principal: Uuid) -> Result<(), AppError> {
    if video.user_id != principal {
        return Err(AppError::Forbidden(
            "Not the owner of this video".to_string(),
        ));
    }
    Ok(())
}

pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Replace the thumbnail of a video with an uploaded image.
    ///
    /// Accepts any sniffed `image/*` type; the declared multipart header is
    /// ignored. Returns the updated record.
    pub async fn upload_thumbnail(
        &self,
        video_id: Uuid,
        principal: Uuid,
        multipart: Multipart,
    ) -> Result<Video, AppError> {
        let mut video = self.fetch_owned_video(video_id, principal).await?;

        let mut staged =
            stage_multipart_field(multipart, "thumbnail", self.state.config.max_thumbnail_size_bytes)
                .await?;

        let content_type = sniff_staged(&mut staged).await?;
        if !content_type.starts_with("image/") {
            return Err(AppError::UnsupportedMediaType(format!(
                "Thumbnails must be images, detected {}",
                content_type
            )));
        }

        let key = format!("{}{}", video_id, extension_for(content_type));
        let data = staged.read_to_vec().await?;

        let locator = self
            .state
            .thumbnail_store
            .put(&key, content_type, data)
            .await
            .map_err(storage_error_to_app)?;

        video.set_thumbnail_url(locator);
        self.state.videos.update_video(&video).await?;

        tracing::info!(
            video_id = %video_id,
            content_type = %content_type,
            size_bytes = staged.len(),
            "Thumbnail upload complete"
        );

        Ok(video)
    }

    /// Replace the video asset of a record with an uploaded MP4.
    ///
    /// Only sniffed `video/mp4` content is accepted. The staged file is
    /// streamed to the store under a 128-bit random key.
    pub async fn upload_video(
        &self,
        video_id: Uuid,
        principal: Uuid,
        multipart: Multipart,
    ) -> Result<Video, AppError> {
        let mut video = self.fetch_owned_video(video_id, principal).await?;

        let mut staged =
            stage_multipart_field(multipart, "video", self.state.config.max_video_size_bytes)
                .await?;

        let content_type = sniff_staged(&mut staged).await?;
        if content_type != "video/mp4" {
            return Err(AppError::UnsupportedMediaType(
                "Only MP4 videos are allowed".to_string(),
            ));
        }

        let mut random_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut random_bytes);
        let key = format!("{}.mp4", hex::encode(random_bytes));

        let size = staged.len();
        let reader = Box::pin(staged) as Pin<Box<dyn AsyncRead + Send + Unpin>>;

        let locator = self
            .state
            .video_store
            .put_stream(&key, content_type, Some(size), reader)
            .await
            .map_err(storage_error_to_app)?;

        video.set_video_url(locator);
        self.state.videos.update_video(&video).await?;

        tracing::info!(
            video_id = %video_id,
            key = %key,
            size_bytes = size,
            "Video upload complete"
        );

        Ok(video)
    }

    /// Dereference the stored thumbnail of a video.
    pub async fn get_thumbnail(&self, video_id: Uuid) -> Result<StoredAsset, AppError> {
        let video = self
            .state
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        let locator = video
            .thumbnail_url
            .as_deref()
            .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

        self.state
            .thumbnail_store
            .get(locator)
            .await
            .map_err(storage_error_to_app)
    }

    async fn fetch_owned_video(
        &self,
        video_id: Uuid,
        principal: Uuid,
    ) -> Result<Video, AppError> {
        let video = self
            .state
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        authorize_owner(&video, principal)?;

        Ok(video)
    }
}

/// Find the named multipart field and stage it onto disk under a byte ceiling.
async fn stage_multipart_field(
    mut multipart: Multipart,
    field_name: &str,
    limit: u64,
) -> Result<StagedUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error_to_app)?
    {
        if field.name() == Some(field_name) {
            return stage_field(field, limit).await;
        }
    }

    Err(AppError::InvalidInput(format!(
        "Missing multipart field '{}'",
        field_name
    )))
}

async fn stage_field(mut field: Field<'_>, limit: u64) -> Result<StagedUpload, AppError> {
    let mut sink = StagingSink::create(limit).map_err(staging_error_to_app)?;

    loop {
        let chunk = field.chunk().await.map_err(multipart_error_to_app)?;

        match chunk {
            Some(bytes) => sink.write_chunk(&bytes).await.map_err(staging_error_to_app)?,
            None => break,
        }
    }

    sink.finish().await.map_err(staging_error_to_app)
}

/// A payload far past the ceiling trips the transport body limit inside the
/// multipart parser before the staging sink ever sees a chunk. That read error
/// still means "too big", so it keeps the 413 taxonomy; everything else about
/// a malformed body is the client's 400.
fn multipart_error_to_app(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(
            "Uploaded file exceeds the size limit".to_string(),
        );
    }
    AppError::InvalidInput(format!("Invalid multipart body: {}", err))
}

/// Sniff the staged content, leaving the handle rewound to position 0.
async fn sniff_staged(staged: &mut StagedUpload) -> Result<&'static str, AppError> {
    if staged.is_empty() {
        return Err(AppError::InvalidInput("File is empty".to_string()));
    }
    let prefix = staged.sniff_prefix().await?;
    Ok(detect_content_type(&prefix))
}
