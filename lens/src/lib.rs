//! Lens: a small HTTP service that extracts text from JPEG uploads by
//! delegating to a cloud OCR provider.

pub mod api;
pub mod config;
pub mod error;
pub mod ocr;
