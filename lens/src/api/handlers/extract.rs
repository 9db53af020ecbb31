//! Text extraction handler.
//!
//! Reads the `image` part of a multipart form, validates it, forwards the
//! bytes to the OCR provider held in [`AppState`] and shapes the result.

use std::time::Instant;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, info};

use crate::api::response::{ErrorResponse, ExtractionResponse, UploadMetadata};
use crate::api::state::AppState;
use crate::api::validation::{payload_too_large, UploadedImage};
use crate::error::{LensError, Result};

pub const IMAGE_FIELD: &str = "image";

/// `POST /extract-text`
///
/// Accepts a multipart form with a JPEG in the `image` field and returns the
/// text the OCR provider found in it.
#[utoipa::path(
    post,
    path = "/extract-text",
    tag = "ocr",
    operation_id = "ocr.extractText",
    request_body(content_type = "multipart/form-data", content = String, description = "JPEG upload in the `image` field (max 10MB)"),
    responses(
        (status = 200, description = "Text extracted", body = ExtractionResponse),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 422, description = "Missing image field", body = ErrorResponse),
        (status = 500, description = "OCR provider error", body = ErrorResponse),
        (status = 503, description = "OCR provider unavailable", body = ErrorResponse),
    )
)]
pub async fn extract_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResponse>> {
    let started = Instant::now();
    let max_bytes = state.config.server.max_upload_bytes;

    let mut multipart = multipart.map_err(|rejection| {
        debug!(error = %rejection, "Request body is not a multipart form");
        LensError::MissingField(IMAGE_FIELD.to_string())
    })?;

    let upload = read_image_field(&mut multipart, max_bytes)
        .await?
        .ok_or_else(|| LensError::MissingField(IMAGE_FIELD.to_string()))?;

    upload.validate(max_bytes)?;

    let extraction = state.ocr.extract_text(&upload.bytes).await?;

    let processing_time_ms = started.elapsed().as_millis() as u64;
    let file_size_bytes = upload.bytes.len() as u64;

    info!(
        filename = upload.filename.as_deref().unwrap_or_default(),
        file_size_bytes,
        text_len = extraction.text.len(),
        processing_time_ms,
        "Successfully processed image"
    );

    Ok(Json(ExtractionResponse {
        success: true,
        text: extraction.text,
        confidence: extraction.confidence,
        processing_time_ms,
        metadata: UploadMetadata {
            filename: upload.filename,
            file_size_bytes,
            content_type: upload.content_type,
        },
    }))
}

/// Walk the form until the `image` part shows up. Other parts are skipped.
async fn read_image_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<UploadedImage>> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(multipart_error(e, max_bytes)),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        // A plain form value is not a file upload.
        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!("Form field `{}` carries no file", IMAGE_FIELD);
            return Err(LensError::MissingField(IMAGE_FIELD.to_string()));
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;

        return Ok(Some(UploadedImage {
            bytes,
            content_type,
            filename: Some(filename),
        }));
    }
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> LensError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        payload_too_large(max_bytes)
    } else {
        LensError::Validation(format!("Failed to read upload: {}", err.body_text()))
    }
}
