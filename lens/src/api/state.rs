use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrProvider;

/// Shared, read-only request context. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ocr: OcrProvider,
}

impl AppState {
    pub fn new(config: Config, ocr: OcrProvider) -> Self {
        Self {
            config: Arc::new(config),
            ocr,
        }
    }
}
