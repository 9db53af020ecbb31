//! Upload validation.
//!
//! Checks run in a fixed order and the first failure wins: content type,
//! filename presence, extension, size limit, emptiness.

use std::path::Path;

use axum::body::Bytes;

use crate::error::{LensError, Result};

pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg"];
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg"];

const MEGABYTE: usize = 1024 * 1024;

/// A file part pulled out of the multipart form, before validation.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl UploadedImage {
    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        validate_upload(
            self.content_type.as_deref(),
            self.filename.as_deref(),
            self.bytes.len(),
            max_bytes,
        )
    }
}

pub fn validate_upload(
    content_type: Option<&str>,
    filename: Option<&str>,
    len: usize,
    max_bytes: usize,
) -> Result<()> {
    if !content_type.is_some_and(is_allowed_content_type) {
        return Err(LensError::Validation(format!(
            "Invalid file format. Only JPG/JPEG images are supported. Received: {}",
            content_type.unwrap_or("none")
        )));
    }

    let filename = match filename {
        Some(name) if !name.is_empty() => name,
        _ => return Err(LensError::Validation("Filename is required".to_string())),
    };

    let extension = file_extension(filename);
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(LensError::Validation(format!(
            "Invalid file extension. Only .jpg and .jpeg are supported. Received: {extension}"
        )));
    }

    if len > max_bytes {
        return Err(payload_too_large(max_bytes));
    }

    if len == 0 {
        return Err(LensError::Validation("Empty file uploaded".to_string()));
    }

    Ok(())
}

pub fn payload_too_large(max_bytes: usize) -> LensError {
    LensError::PayloadTooLarge(format!(
        "File size exceeds {} limit",
        format_size_limit(max_bytes)
    ))
}

fn is_allowed_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_CONTENT_TYPES.contains(&essence.as_str())
}

/// Lower-cased extension including the leading dot, or empty.
///
/// Dotfiles such as `.jpg` have no extension.
fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn format_size_limit(max_bytes: usize) -> String {
    if max_bytes >= MEGABYTE && max_bytes % MEGABYTE == 0 {
        format!("{}MB", max_bytes / MEGABYTE)
    } else {
        format!("{max_bytes} byte")
    }
}
