mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::{jpeg_bytes, mp4_bytes, png_bytes, png_bytes_of_len, text_bytes};
use helpers::{setup_test_app, TEST_MAX_THUMBNAIL_BYTES};
use tubely_storage::data_url::decode_data_url;
use uuid::Uuid;

fn thumbnail_form(bytes: Vec<u8>, declared_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(bytes)
            .file_name("thumb.png")
            .mime_type(declared_type),
    )
}

#[tokio::test]
async fn test_owner_uploads_thumbnail() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.insert_video(user_id);

    let payload = png_bytes();
    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(user_id)))
        .multipart(thumbnail_form(payload.clone(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let locator = body["thumbnail_url"].as_str().expect("thumbnail_url set");
    assert!(locator.starts_with("data:image/png;base64,"));

    // The locator round-trips to the exact uploaded bytes.
    let asset = decode_data_url(locator).unwrap();
    assert_eq!(asset.content_type, "image/png");
    assert_eq!(asset.data, payload);

    // The record was persisted, not just echoed.
    let stored = app.repo.get(video.id).unwrap();
    assert_eq!(stored.thumbnail_url.as_deref(), Some(locator));
    assert!(stored.updated_at > video.updated_at);
}

#[tokio::test]
async fn test_non_owner_is_forbidden_and_record_unchanged() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let video = app.insert_video(owner);

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(intruder)))
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 403);

    let stored = app.repo.get(video.id).unwrap();
    assert!(stored.thumbnail_url.is_none());
    assert_eq!(stored.updated_at, video.updated_at);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup_test_app().await;
    let video = app.insert_video(Uuid::new_v4());

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = setup_test_app().await;
    let video = app.insert_video(Uuid::new_v4());

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", "Bearer not.a.jwt")
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_unknown_video_is_not_found() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", Uuid::new_v4()))
        .add_header("Authorization", format!("Bearer {}", app.token_for(user_id)))
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_oversized_thumbnail_is_rejected() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.insert_video(user_id);

    let oversized = png_bytes_of_len(TEST_MAX_THUMBNAIL_BYTES as usize + 1);
    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(user_id)))
        .multipart(thumbnail_form(oversized, "image/png"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.repo.get(video.id).unwrap().thumbnail_url.is_none());
}

#[tokio::test]
async fn test_non_image_payload_is_unsupported() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.insert_video(user_id);

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(user_id)))
        .multipart(thumbnail_form(text_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 415);
}

#[tokio::test]
async fn test_sniffed_type_wins_over_declared_header() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.insert_video(user_id);

    // MP4 magic declared as image/png: the sniffed type is what counts.
    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(user_id)))
        .multipart(thumbnail_form(mp4_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 415);

    // JPEG magic declared as image/png: stored under the sniffed type.
    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(user_id)))
        .multipart(thumbnail_form(jpeg_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["thumbnail_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn test_missing_multipart_field_is_invalid() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.insert_video(user_id);

    let form = MultipartForm::new().add_part(
        "something_else",
        Part::bytes(png_bytes()).file_name("x.png").mime_type("image/png"),
    );

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", format!("Bearer {}", app.token_for(user_id)))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_invalid_video_id_is_bad_request() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();

    let response = app
        .client()
        .post("/api/thumbnail_upload/not-a-uuid")
        .add_header("Authorization", format!("Bearer {}", app.token_for(user_id)))
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 400);
}
