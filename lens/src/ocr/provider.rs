use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::{parse_ocr_provider_model, OcrConfig, KNOWN_OCR_PROVIDERS};
use crate::error::{LensError, Result};

use super::api::{ChatVisionClient, GoogleVisionClient};
use super::types::TextDetector;

/// Confidence reported whenever text was found. Providers don't give us a
/// usable document-level score, so this is a fixed placeholder.
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.95;

/// Text pulled from one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub confidence: f64,
}

impl Extraction {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
        }
    }
}

#[derive(Clone)]
enum OcrBackend {
    Api { detector: Arc<dyn TextDetector> },
    Unavailable { reason: String },
}

/// The OCR capability handed to request handlers.
///
/// Built once at startup. A provider that failed to initialize stays
/// unavailable for the life of the process.
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Self {
        let (provider, _) = parse_ocr_provider_model(&config.model);
        let provider = provider.to_lowercase();

        let detector: Result<Arc<dyn TextDetector>> = match provider.as_str() {
            "google" => GoogleVisionClient::new(config).map(|c| Arc::new(c) as Arc<dyn TextDetector>),
            "openai" | "mistral" => {
                ChatVisionClient::new(config).map(|c| Arc::new(c) as Arc<dyn TextDetector>)
            }
            other => Err(LensError::Ocr(format!(
                "Unknown OCR provider '{other}' (expected one of: {})",
                KNOWN_OCR_PROVIDERS.join(", ")
            ))),
        };

        match detector {
            Ok(detector) => {
                info!(backend = detector.name(), model = %config.model, "OCR client initialized");
                Self::with_detector(detector)
            }
            Err(e) => {
                let reason = format!("OCR backend unavailable: {e}");
                warn!("{}", reason);
                Self::unavailable(reason)
            }
        }
    }

    /// Wrap an already-constructed detector.
    pub fn with_detector(detector: Arc<dyn TextDetector>) -> Self {
        Self {
            backend: OcrBackend::Api { detector },
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub fn backend_name(&self) -> Option<&str> {
        match &self.backend {
            OcrBackend::Api { detector } => Some(detector.name()),
            OcrBackend::Unavailable { .. } => None,
        }
    }

    /// Send image bytes to the provider and reduce its answer to a single
    /// block of text.
    pub async fn extract_text(&self, image_bytes: &[u8]) -> Result<Extraction> {
        let detector = match &self.backend {
            OcrBackend::Api { detector } => detector,
            OcrBackend::Unavailable { reason } => {
                error!(reason = %reason, "OCR client not initialized");
                return Err(LensError::OcrUnavailable(
                    "OCR service unavailable".to_string(),
                ));
            }
        };

        if image_bytes.is_empty() {
            return Err(LensError::Validation("Empty image content".to_string()));
        }

        let detection = detector.detect_text(image_bytes).await?;

        if let Some(message) = detection.error() {
            error!(backend = detector.name(), error = %message, "OCR provider error");
            return Err(LensError::Ocr(
                "Failed to process image with OCR provider".to_string(),
            ));
        }

        let Some(first) = detection.annotations.into_iter().next() else {
            return Ok(Extraction::empty());
        };

        let confidence = if first.description.is_empty() {
            0.0
        } else {
            PLACEHOLDER_CONFIDENCE
        };

        Ok(Extraction {
            text: first.description,
            confidence,
        })
    }
}
