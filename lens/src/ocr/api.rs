use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{LensError, Result};

use super::types::{TextAnnotation, TextDetection, TextDetector};

const GOOGLE_VISION_BASE_URL: &str = "https://vision.googleapis.com/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";

const EXTRACTION_PROMPT: &str = "Extract all text from this image. Return only the extracted text without any explanations or formatting.";

fn build_http_client() -> Result<Client> {
    Client::builder()
        .build()
        .map_err(|e| LensError::Ocr(format!("Failed to create HTTP client: {e}")))
}

// ---------------------------------------------------------------------------
// Google Cloud Vision
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct GoogleVisionClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct VisionErrorBody {
    error: VisionStatus,
}

impl AnnotateImageResponse {
    fn into_detection(self) -> TextDetection {
        TextDetection {
            annotations: self
                .text_annotations
                .into_iter()
                .map(|a| TextAnnotation::new(a.description))
                .collect(),
            error_message: self.error.map(|e| e.message),
        }
    }
}

impl GoogleVisionClient {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LensError::Ocr("API key required for Google Vision".to_string()))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GOOGLE_VISION_BASE_URL.to_string());

        Ok(Self {
            client: build_http_client()?,
            api_key,
            base_url,
        })
    }

    fn annotate_request(image_bytes: &[u8]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image_bytes),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        }
    }
}

#[async_trait]
impl TextDetector for GoogleVisionClient {
    async fn detect_text(&self, image_bytes: &[u8]) -> Result<TextDetection> {
        let resp = self
            .client
            .post(format!("{}/images:annotate", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::annotate_request(image_bytes))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<VisionErrorBody>(&body)
                .map(|b| b.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("Vision API request failed: {status}"));
            return Ok(TextDetection::with_error(message));
        }

        let annotate: AnnotateResponse = resp
            .json()
            .await
            .map_err(|e| LensError::Ocr(format!("Failed to parse response: {e}")))?;

        Ok(annotate
            .responses
            .into_iter()
            .next()
            .map(AnnotateImageResponse::into_detection)
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "google-vision"
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible vision chat (OpenAI, Mistral)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ChatVisionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    provider: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

impl ChatVisionClient {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (provider, model) = parse_ocr_provider_model(&config.model);
        let provider = provider.to_lowercase();

        let (default_base_url, default_model) = match provider.as_str() {
            "openai" => (OPENAI_BASE_URL, "gpt-4o"),
            "mistral" => (MISTRAL_BASE_URL, "pixtral-12b-2409"),
            other => {
                return Err(LensError::Ocr(format!(
                    "Unsupported chat vision provider: {other}"
                )))
            }
        };

        let api_key = config.api_key.clone().ok_or_else(|| {
            LensError::Ocr(format!("API key required for {provider} vision OCR"))
        })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url.to_string());

        let model = if model.is_empty() {
            default_model.to_string()
        } else {
            model.to_string()
        };

        Ok(Self {
            client: build_http_client()?,
            api_key,
            base_url,
            model,
            provider,
        })
    }

    fn chat_request(&self, image_bytes: &[u8]) -> ChatRequest {
        let data_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(image_bytes));

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: EXTRACTION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: 4096,
        }
    }
}

#[async_trait]
impl TextDetector for ChatVisionClient {
    async fn detect_text(&self, image_bytes: &[u8]) -> Result<TextDetection> {
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.chat_request(image_bytes))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Ok(TextDetection::with_error(format!(
                "API request failed: {status} - {body}"
            )));
        }

        let chat_response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LensError::Ocr(format!("Failed to parse response: {e}")))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            Ok(TextDetection::default())
        } else {
            Ok(TextDetection::with_text(text))
        }
    }

    fn name(&self) -> &str {
        &self.provider
    }
}
