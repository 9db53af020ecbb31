use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),
}

pub type Result<T> = std::result::Result<T, LensError>;
