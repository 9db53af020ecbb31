use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;

pub const SERVICE_NAME: &str = "OCR Text Extraction API";

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// `healthy` when the OCR client initialized, otherwise `unavailable`.
    pub vision_api: String,
    /// Unix time in seconds.
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let vision_api = if state.ocr.is_available() {
        "healthy"
    } else {
        "unavailable"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        vision_api: vision_api.to_string(),
        timestamp: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
    })
}

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service descriptor", body = ServiceInfo),
    )
)]
pub async fn service_info() -> Json<ServiceInfo> {
    let endpoints = [
        ("extract_text", "/extract-text (POST)"),
        ("health", "/health (GET)"),
        ("openapi", "/openapi.json (GET)"),
        ("docs", "/docs (GET)"),
    ]
    .into_iter()
    .map(|(name, route)| (name.to_string(), route.to_string()))
    .collect();

    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}
