use crate::auth::{bearer_token, verify_token};
use crate::error::HttpAppError;
use crate::services::upload::UploadService;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::models::Video;
use uuid::Uuid;

/// `POST /api/thumbnail_upload/{videoID}`
///
/// Multipart field `thumbnail`. Responds with the updated video record.
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let token = bearer_token(&headers)?;
    let principal = verify_token(token, &state.config.jwt_secret)?;

    tracing::debug!(video_id = %video_id, user_id = %principal, "Thumbnail upload requested");

    let service = UploadService::new(state);
    let video = service
        .upload_thumbnail(video_id, principal, multipart)
        .await?;

    Ok(Json(video))
}
