use crate::{
    config::GeminiConfig,
    error::{Result, ViewsError},
    gemini::ImageGenerator,
    models::{
        Content, EncodedImage, GenerateContentRequest, GenerateContentResponse,
        GenerationConfig, InlineData, Modality, Part,
    },
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ViewsError::ConfigError("Gemini API key is required".into()));
        }

        let client = Client::builder()
            .user_agent(concat!("rgenviews/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ViewsError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, timeouts).
    pub fn with_http_client(config: GeminiConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn build_request(image: &EncodedImage, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline(image.mime_type.as_str(), image.payload.as_str()),
                    Part::text(prompt),
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec![Modality::Image, Modality::Text],
            },
        }
    }

    /// Pull the generated image out of a response body. A response without
    /// an inline image part counts as a failure, whatever the reason.
    pub fn parse_response(body: &str) -> Result<InlineData> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| ViewsError::ResponseError(format!("malformed response: {}", e)))?;

        match response.first_inline_image() {
            Some(inline) if !inline.data.is_empty() => {
                STANDARD.decode(&inline.data).map_err(|e| {
                    ViewsError::ResponseError(format!("malformed image payload: {}", e))
                })?;
                Ok(inline.clone())
            }
            _ => {
                let detail = response
                    .text()
                    .map(|text| format!(" (model said: {})", text))
                    .unwrap_or_default();
                Err(ViewsError::ResponseError(format!(
                    "image data not found in response{}",
                    detail
                )))
            }
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(&self, image: &EncodedImage, prompt: &str) -> Result<InlineData> {
        let payload = Self::build_request(image, prompt);

        log::debug!("Invoking model: {}", self.config.model);

        let response = self
            .client
            .post(self.config.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ViewsError::RequestError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ViewsError::ResponseError(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ViewsError::ResponseError(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        Self::parse_response(&body)
    }
}
