//! # Response Envelopes & Error Contract
//!
//! Every extraction request answers with one of two flat JSON shapes that
//! share the `success` and `processing_time_ms` keys:
//!
//! ```json
//! { "success": true, "text": "...", "confidence": 0.95, "processing_time_ms": 41,
//!   "metadata": { "filename": "a.jpg", "file_size_bytes": 2048, "content_type": "image/jpeg" } }
//! ```
//!
//! ```json
//! { "success": false, "error": "invalid_request", "detail": "...", "processing_time_ms": 0 }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::LensError;

/// Machine-readable error category included in every error response.
///
/// Serialized as a snake_case string on the wire (e.g. `"invalid_request"`).
/// Each variant maps to a fixed HTTP status code via [`ErrorCode::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The upload failed validation. HTTP 400.
    InvalidRequest,
    /// The upload exceeds the size limit. HTTP 413.
    PayloadTooLarge,
    /// A required form field is missing. HTTP 422.
    UnprocessableEntity,
    /// The OCR provider failed, or something unexpected broke. HTTP 500.
    InternalError,
    /// The OCR client never initialized. HTTP 503.
    ServiceUnavailable,
}

impl ErrorCode {
    /// Returns the HTTP status code corresponding to this error code.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::PayloadTooLarge => write!(f, "payload_too_large"),
            Self::UnprocessableEntity => write!(f, "unprocessable_entity"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

/// Echo of what the client declared about the upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadMetadata {
    pub filename: Option<String>,
    pub file_size_bytes: u64,
    pub content_type: Option<String>,
}

/// Successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExtractionResponse {
    pub success: bool,
    /// Extracted text. Empty when the provider found none.
    pub text: String,
    /// 0.0 when no text was found, otherwise a fixed placeholder.
    pub confidence: f64,
    pub processing_time_ms: u64,
    pub metadata: UploadMetadata,
}

/// Failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorCode,
    /// Human-readable description safe to show to end users.
    pub detail: String,
    pub processing_time_ms: u64,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            error: code,
            detail: detail.into(),
            processing_time_ms: 0,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.error.status()
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<LensError> for ErrorResponse {
    /// Transport and internal failures are logged and replaced with a generic
    /// message; everything else already carries a client-safe detail.
    fn from(err: LensError) -> Self {
        match err {
            LensError::Validation(msg) => ErrorResponse::new(ErrorCode::InvalidRequest, msg),

            LensError::PayloadTooLarge(msg) => ErrorResponse::new(ErrorCode::PayloadTooLarge, msg),

            LensError::MissingField(field) => ErrorResponse::new(
                ErrorCode::UnprocessableEntity,
                format!("Missing required field: {field}"),
            ),

            LensError::Ocr(msg) => ErrorResponse::new(ErrorCode::InternalError, msg),

            LensError::OcrUnavailable(msg) => {
                ErrorResponse::new(ErrorCode::ServiceUnavailable, msg)
            }

            LensError::Http(err) => {
                tracing::error!(error = %err, "OCR provider request failed");
                ErrorResponse::new(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}

impl IntoResponse for LensError {
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}
