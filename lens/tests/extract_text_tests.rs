mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use lens::ocr::{OcrProvider, TextDetection};

use common::{
    app_with, app_with_limit, body_json, default_app, extract_request, sample_jpeg, MockDetector,
    Part,
};

// --- Valid uploads ---

#[tokio::test]
async fn test_extract_text_valid_jpg() {
    let (app, detector) = default_app();
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[Part::image("test.jpg", "image/jpeg", &jpeg)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await;
    assert_eq!(data["success"], true);
    assert_eq!(data["text"], "Hello World");
    assert_eq!(data["confidence"], 0.95);
    assert!(data["processing_time_ms"].is_u64());
    assert_eq!(
        data["metadata"],
        json!({
            "filename": "test.jpg",
            "file_size_bytes": jpeg.len(),
            "content_type": "image/jpeg"
        })
    );
    assert_eq!(detector.calls(), 1);
}

#[tokio::test]
async fn test_extract_text_jpeg_extension() {
    let (app, _) = default_app();
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[Part::image("photo.jpeg", "image/jpeg", &jpeg)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);
}

#[tokio::test]
async fn test_extract_text_accepts_image_jpg_and_uppercase_extension() {
    let (app, _) = default_app();
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[Part::image("SCAN.JPG", "image/jpg", &jpeg)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await;
    assert_eq!(data["metadata"]["content_type"], "image/jpg");
}

#[tokio::test]
async fn test_extract_text_ignores_unrelated_fields() {
    let (app, _) = default_app();
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[
            Part::text("note", "receipt from tuesday"),
            Part::image("test.jpg", "image/jpeg", &jpeg),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// --- Invalid format ---

#[tokio::test]
async fn test_extract_text_invalid_content_type() {
    let (app, detector) = default_app();

    let response = app
        .oneshot(extract_request(&[Part::image("test.png", "image/png", b"fakepng")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let data = body_json(response).await;
    assert_eq!(data["success"], false);
    assert_eq!(data["error"], "invalid_request");
    assert_eq!(data["processing_time_ms"], 0);
    assert!(data["detail"]
        .as_str()
        .unwrap()
        .contains("Invalid file format"));
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn test_extract_text_invalid_extension() {
    let (app, _) = default_app();
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[Part::image("test.png", "image/jpeg", &jpeg)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let data = body_json(response).await;
    assert!(data["detail"]
        .as_str()
        .unwrap()
        .contains("Invalid file extension"));
}

#[tokio::test]
async fn test_extract_text_no_filename() {
    let (app, _) = default_app();
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[Part::image("", "image/jpeg", &jpeg)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let data = body_json(response).await;
    assert_eq!(data["detail"], "Filename is required");
}

// --- Size validation ---

#[tokio::test]
async fn test_extract_text_empty_file() {
    let (app, detector) = default_app();

    let response = app
        .oneshot(extract_request(&[Part::image("test.jpg", "image/jpeg", b"")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let data = body_json(response).await;
    assert!(data["detail"].as_str().unwrap().contains("Empty file"));
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn test_extract_text_file_too_large() {
    let (app, detector) = default_app();
    let large_content = vec![0xFFu8; 10 * 1024 * 1024 + 1];

    let response = app
        .oneshot(extract_request(&[Part::image(
            "test.jpg",
            "image/jpeg",
            &large_content,
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let data = body_json(response).await;
    assert_eq!(data["success"], false);
    assert_eq!(data["error"], "payload_too_large");
    assert_eq!(data["detail"], "File size exceeds 10MB limit");
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn test_extract_text_body_over_framework_limit_is_413() {
    let detector = MockDetector::new(TextDetection::with_text("unused"));
    let app = app_with_limit(OcrProvider::with_detector(detector.clone()), 1024);
    let huge = vec![0xFFu8; 2 * 1024 * 1024];

    let response = app
        .oneshot(extract_request(&[Part::image("test.jpg", "image/jpeg", &huge)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let data = body_json(response).await;
    assert_eq!(data["error"], "payload_too_large");
    assert_eq!(detector.calls(), 0);
}

// --- Provider outcomes ---

#[tokio::test]
async fn test_extract_text_no_text_found() {
    let detector = MockDetector::new(TextDetection::default());
    let app = app_with(OcrProvider::with_detector(detector));
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[Part::image("test.jpg", "image/jpeg", &jpeg)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await;
    assert_eq!(data["success"], true);
    assert_eq!(data["text"], "");
    assert_eq!(data["confidence"], 0.0);
}

#[tokio::test]
async fn test_extract_text_provider_error() {
    let detector = MockDetector::new(TextDetection::with_error("Some API error"));
    let app = app_with(OcrProvider::with_detector(detector));
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[Part::image("test.jpg", "image/jpeg", &jpeg)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let data = body_json(response).await;
    assert_eq!(data["success"], false);
    assert_eq!(data["error"], "internal_error");
    assert!(!data["detail"].as_str().unwrap().contains("Some API error"));
}

#[tokio::test]
async fn test_extract_text_client_unavailable() {
    let app = app_with(OcrProvider::unavailable("no credentials"));
    let jpeg = sample_jpeg();

    let response = app
        .oneshot(extract_request(&[Part::image("test.jpg", "image/jpeg", &jpeg)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let data = body_json(response).await;
    assert_eq!(data["error"], "service_unavailable");
    assert!(data["detail"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("unavailable"));
}

#[tokio::test]
async fn test_validation_runs_before_unavailable_check() {
    let app = app_with(OcrProvider::unavailable("no credentials"));

    let response = app
        .oneshot(extract_request(&[Part::image("test.png", "image/png", b"png")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// --- Missing parameter ---

#[tokio::test]
async fn test_extract_text_missing_file() {
    let (app, _) = default_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/extract-text")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data = body_json(response).await;
    assert_eq!(data["error"], "unprocessable_entity");
    assert_eq!(data["detail"], "Missing required field: image");
}

#[tokio::test]
async fn test_extract_text_image_sent_as_plain_value() {
    let (app, detector) = default_app();

    let response = app
        .oneshot(extract_request(&[Part::text("image", "not a file")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data = body_json(response).await;
    assert_eq!(data["error"], "unprocessable_entity");
    assert_eq!(data["detail"], "Missing required field: image");
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn test_extract_text_form_without_image_field() {
    let (app, _) = default_app();

    let response = app
        .oneshot(extract_request(&[Part::text("file", "not the right field")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
