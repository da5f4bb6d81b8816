use crate::auth::{bearer_token, verify_token};
use crate::error::HttpAppError;
use crate::services::upload::UploadService;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
};
use std::sync::Arc;
use uuid::Uuid;

/// `POST /api/video_upload/{videoID}`
///
/// Multipart field `video`; only MP4 content is accepted. Responds with a
/// plain confirmation once the record points at the stored object.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<&'static str, HttpAppError> {
    let token = bearer_token(&headers)?;
    let principal = verify_token(token, &state.config.jwt_secret)?;

    tracing::debug!(video_id = %video_id, user_id = %principal, "Video upload requested");

    let service = UploadService::new(state);
    service.upload_video(video_id, principal, multipart).await?;

    Ok("Video uploaded successfully")
}
