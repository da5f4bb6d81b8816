//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tubely_core::constants::API_PREFIX;

/// Slack for multipart boundaries and part headers on top of the payload
/// ceiling. The staging sink enforces the exact per-file limit.
const MULTIPART_OVERHEAD_BYTES: usize = 1 << 20;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let thumbnail_body_limit =
        state.config.max_thumbnail_size_bytes as usize + MULTIPART_OVERHEAD_BYTES;
    let video_body_limit = state.config.max_video_size_bytes as usize + MULTIPART_OVERHEAD_BYTES;

    let api_routes = Router::new()
        .route(
            "/thumbnail_upload/{videoID}",
            post(handlers::upload_thumbnail).layer(DefaultBodyLimit::max(thumbnail_body_limit)),
        )
        .route(
            "/video_upload/{videoID}",
            post(handlers::upload_video).layer(DefaultBodyLimit::max(video_body_limit)),
        )
        .route("/thumbnails/{videoID}", get(handlers::get_thumbnail));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .nest(API_PREFIX, api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
