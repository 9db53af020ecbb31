// Shared helpers for HTTP-level tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;

use lens::api::{create_router, AppState};
use lens::config::{Config, OcrConfig, ServerConfig};
use lens::error::Result;
use lens::ocr::{OcrProvider, TextDetection, TextDetector};

pub const BOUNDARY: &str = "lens-test-boundary";

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Minimal JPEG: SOI, JFIF APP0 header, padding, EOI.
pub fn sample_jpeg() -> Vec<u8> {
    let mut bytes = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00\x01\x01\x00\x00\x01\x00\x01\x00\x00".to_vec();
    bytes.extend(std::iter::repeat(0u8).take(100));
    bytes.extend_from_slice(b"\xff\xd9");
    bytes
}

/// One part of a multipart form.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn image(filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name: "image",
            filename: Some(filename),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            data: value.as_bytes(),
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{filename}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn extract_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/extract-text")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// Detector that answers every call with the same detection.
pub struct MockDetector {
    detection: TextDetection,
    calls: AtomicUsize,
}

impl MockDetector {
    pub fn new(detection: TextDetection) -> Arc<Self> {
        Arc::new(Self {
            detection,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextDetector for MockDetector {
    async fn detect_text(&self, _image_bytes: &[u8]) -> Result<TextDetection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.detection.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn test_config(max_upload_bytes: usize) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes,
        },
        ocr: OcrConfig::default(),
    }
}

pub fn app_with(ocr: OcrProvider) -> Router {
    app_with_limit(ocr, lens::config::DEFAULT_MAX_UPLOAD_BYTES)
}

pub fn app_with_limit(ocr: OcrProvider, max_upload_bytes: usize) -> Router {
    init_test_logger();
    create_router(AppState::new(test_config(max_upload_bytes), ocr))
}

/// App backed by a detector that always finds "Hello World".
pub fn default_app() -> (Router, Arc<MockDetector>) {
    let detector = MockDetector::new(TextDetection::with_text("Hello World"));
    (app_with(OcrProvider::with_detector(detector.clone())), detector)
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
