//! Boundary to the hosted text- and image-generation service.
//!
//! Core code only builds prompts and consumes results; transport lives behind the
//! [`GenerationClient`] trait so the REST layer and CLI can plug in the real HTTP client while
//! tests use a stub. Every call is a single request/response with no retry: callers decide how
//! to report a failure.

use async_trait::async_trait;

/// Failure of an external generation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation service is not configured: {0}")]
    NotConfigured(String),
    #[error("generation request failed: {0}")]
    RequestFailed(String),
    #[error("generation service rejected the API key")]
    AuthFailed,
    #[error("generation service rate limited the request")]
    RateLimited,
    #[error("invalid response from generation service: {0}")]
    InvalidResponse(String),
    #[error("generation service returned no result")]
    EmptyResult,
}

pub type GenerationResult<T> = std::result::Result<T, GenerationError>;

/// A text completion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRequest {
    pub model: String,
    pub prompt: String,
}

/// An image generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub count: u8,
    pub response_format: String,
}

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Returns the completion text for a single user prompt.
    async fn complete_text(&self, request: &TextRequest) -> GenerationResult<String>;

    /// Returns the decoded bytes of the first generated image.
    async fn generate_image(&self, request: &ImageRequest) -> GenerationResult<Vec<u8>>;
}
