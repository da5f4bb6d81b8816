use crate::error::HttpAppError;
use crate::services::upload::UploadService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_media::detect_content_type;
use uuid::Uuid;

/// `GET /api/thumbnails/{videoID}`
///
/// Serves the stored thumbnail bytes. The Content-Type is re-sniffed from the
/// first 512 bytes of the asset rather than trusting stored metadata.
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let service = UploadService::new(state);
    let asset = service.get_thumbnail(video_id).await?;

    let content_type = detect_content_type(&asset.data);
    let content_length = asset.data.len();

    tracing::debug!(
        video_id = %video_id,
        content_type = %content_type,
        size_bytes = content_length,
        "Serving thumbnail"
    );

    let mut response = (StatusCode::OK, asset.data).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type),
    );
    response.headers_mut().insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(content_length),
    );

    Ok(response)
}
