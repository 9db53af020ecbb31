use async_trait::async_trait;

use crate::error::Result;

/// A single block of text reported by a provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAnnotation {
    pub description: String,
}

impl TextAnnotation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Structured provider response for one image.
///
/// Providers report failures in-band through `error_message`; transport
/// failures are returned as `Err` from [`TextDetector::detect_text`] instead.
/// The first annotation, when present, holds the full detected text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDetection {
    pub annotations: Vec<TextAnnotation>,
    pub error_message: Option<String>,
}

impl TextDetection {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            annotations: vec![TextAnnotation::new(text)],
            error_message: None,
        }
    }

    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            error_message: Some(message.into()),
        }
    }

    /// The provider error, ignoring blank messages.
    pub fn error(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .filter(|message| !message.is_empty())
    }
}

/// The external OCR capability: raw image bytes in, detected text out.
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect_text(&self, image_bytes: &[u8]) -> Result<TextDetection>;

    /// Short backend name used in logs, e.g. `google-vision`.
    fn name(&self) -> &str;
}
