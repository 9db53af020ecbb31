use serde::Deserialize;
use std::env;

/// Uploads larger than this are rejected with 413 unless overridden.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Treats an empty variable the same as an unset one.
fn env_non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// `<provider>/<model>`, e.g. `google/vision` or `openai/gpt-4o`.
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model: "google/vision".to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env_non_empty("LENS_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_env_or("LENS_PORT", 8080),
                max_upload_bytes: parse_env_or("LENS_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
            ocr: OcrConfig {
                model: env_non_empty("OCR_MODEL").unwrap_or_else(|| "google/vision".to_string()),
                api_key: env_non_empty("OCR_API_KEY"),
                base_url: env_non_empty("OCR_BASE_URL"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known OCR providers.
pub const KNOWN_OCR_PROVIDERS: &[&str] = &["google", "openai", "mistral"];

/// Split an OCR model string into a (provider, model) tuple.
///
/// A bare name without a `/` is treated as a Google Vision model.
pub fn parse_ocr_provider_model(model: &str) -> (&str, &str) {
    match model.split_once('/') {
        Some((prefix, rest)) => (prefix, rest),
        None => ("google", model),
    }
}
