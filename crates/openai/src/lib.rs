//! # Ausome OpenAI
//!
//! reqwest-based [`GenerationClient`] for the OpenAI chat completions and image generation
//! endpoints.
//!
//! The client is built even when no API key is configured so prompt-only features keep
//! working; generation calls then fail with [`GenerationError::NotConfigured`].

use async_trait::async_trait;
use ausome_core::generation::{
    GenerationClient, GenerationError, GenerationResult, ImageRequest, TextRequest,
};
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the OpenAI API.
#[derive(Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key
                .map(|key| key.trim().to_owned())
                .filter(|key| !key.is_empty()),
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Resolve settings from raw environment values.
    ///
    /// Blank values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NotConfigured`] if the timeout is not a positive number of
    /// seconds.
    pub fn from_env_values(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> GenerationResult<Self> {
        let base_url = base_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match timeout_secs.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(GenerationError::NotConfigured(format!(
                        "AUSOME_HTTP_TIMEOUT_SECS must be a positive integer, got {raw:?}"
                    )))
                }
            },
        };

        Ok(Self::new(
            api_key,
            base_url,
            Duration::from_secs(timeout_secs),
        ))
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// OpenAI text and image generation client.
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`GenerationError::NotConfigured`] if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> GenerationResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::NotConfigured(format!("HTTP client: {e}")))?;

        if !config.has_api_key() {
            tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail");
        }

        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn api_key(&self) -> GenerationResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured("OPENAI_API_KEY is not set".into()))
    }

    async fn send_request<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> GenerationResult<R> {
        let api_key = self.api_key()?;
        let url = self.api_url(path);

        tracing::debug!("Sending request to OpenAI API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let response_text = response.text().await.unwrap_or_default();

        tracing::debug!("OpenAI response status: {}", status);

        if !status.is_success() {
            if status.as_u16() == 401 {
                return Err(GenerationError::AuthFailed);
            }
            if status.as_u16() == 429 {
                return Err(GenerationError::RateLimited);
            }
            return Err(GenerationError::RequestFailed(format!(
                "HTTP {}: {}",
                status, response_text
            )));
        }

        serde_json::from_str(&response_text)
            .map_err(|e| GenerationError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn complete_text(&self, request: &TextRequest) -> GenerationResult<String> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response: ChatCompletionResponse = self.send_request("chat/completions", &body).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyResult)
    }

    async fn generate_image(&self, request: &ImageRequest) -> GenerationResult<Vec<u8>> {
        let body = ImageGenerationRequest {
            model: &request.model,
            prompt: &request.prompt,
            size: &request.size,
            quality: &request.quality,
            n: request.count,
            response_format: &request.response_format,
        };

        let response: ImageGenerationResponse =
            self.send_request("images/generations", &body).await?;

        let encoded = response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.b64_json)
            .ok_or(GenerationError::EmptyResult)?;

        general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| GenerationError::InvalidResponse(format!("image is not base64: {}", e)))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u8,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    b64_json: Option<String>,
}
