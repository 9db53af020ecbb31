use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OCR Text Extraction API",
        version = "1.0.0",
        description = "Extract text from JPG images using a cloud OCR provider.",
    ),
    paths(
        handlers::health::service_info,
        handlers::health::health_check,
        handlers::extract::extract_text,
    ),
    components(schemas(
        response::ErrorCode,
        response::ErrorResponse,
        response::ExtractionResponse,
        response::UploadMetadata,
        handlers::health::HealthResponse,
        handlers::health::ServiceInfo,
    )),
    tags(
        (name = "health", description = "Service descriptor and health check"),
        (name = "ocr", description = "Text extraction from images"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
