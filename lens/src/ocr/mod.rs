//! OCR (Optical Character Recognition) Module
//!
//! Text extraction is delegated entirely to a cloud provider. This module owns
//! the boundary to that provider and the rules for turning its answer into a
//! single block of text.
//!
//! # Architecture
//!
//! - `TextDetector` trait is the provider capability (bytes in, annotations out)
//! - `GoogleVisionClient` implements it against Google Cloud Vision
//! - `ChatVisionClient` implements it against OpenAI-compatible vision chat APIs
//! - `OcrProvider` wraps a detector, or records why none could be built
//!
//! # Configuration
//!
//! Backend selection is controlled via `OcrConfig` (see `config.rs`):
//! - `model`: `<provider>/<model>`, e.g. `google/vision`, `openai/gpt-4o`
//! - `api_key`: Authentication for the provider
//! - `base_url`: Custom endpoint for proxies or emulators
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr);
//! let extraction = ocr.extract_text(&image_bytes).await?;
//! ```

mod api;
mod provider;
mod types;

pub use api::{ChatVisionClient, GoogleVisionClient};
pub use provider::{Extraction, OcrProvider, PLACEHOLDER_CONFIDENCE};
pub use types::{TextAnnotation, TextDetection, TextDetector};
