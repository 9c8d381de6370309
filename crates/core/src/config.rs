//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{
    DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, IMAGE_COUNT, IMAGE_QUALITY, IMAGE_RESPONSE_FORMAT,
    IMAGE_SIZE,
};
use crate::generation::{ImageRequest, TextRequest};
use crate::{WorksheetError, WorksheetResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    text_model: String,
    image_model: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.into(),
            image_model: DEFAULT_IMAGE_MODEL.into(),
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`WorksheetError::InvalidInput`] if either model name is empty.
    pub fn new(text_model: String, image_model: String) -> WorksheetResult<Self> {
        if text_model.trim().is_empty() {
            return Err(WorksheetError::InvalidInput(
                "text_model cannot be empty".into(),
            ));
        }
        if image_model.trim().is_empty() {
            return Err(WorksheetError::InvalidInput(
                "image_model cannot be empty".into(),
            ));
        }

        Ok(Self {
            text_model: text_model.trim().to_owned(),
            image_model: image_model.trim().to_owned(),
        })
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    pub fn text_request(&self, prompt: String) -> TextRequest {
        TextRequest {
            model: self.text_model.clone(),
            prompt,
        }
    }

    /// One standard-quality 1024x1024 image, returned as base64.
    pub fn image_request(&self, prompt: String) -> ImageRequest {
        ImageRequest {
            model: self.image_model.clone(),
            prompt,
            size: IMAGE_SIZE.into(),
            quality: IMAGE_QUALITY.into(),
            count: IMAGE_COUNT,
            response_format: IMAGE_RESPONSE_FORMAT.into(),
        }
    }
}

/// Resolve a model name from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
pub fn model_from_env_value(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_models() {
        assert!(CoreConfig::new(" ".into(), "dall-e-3".into()).is_err());
        assert!(CoreConfig::new("gpt-4.1-mini".into(), "".into()).is_err());
    }

    #[test]
    fn model_from_env_value_falls_back_to_default() {
        assert_eq!(model_from_env_value(None, "m"), "m");
        assert_eq!(model_from_env_value(Some("  ".into()), "m"), "m");
        assert_eq!(model_from_env_value(Some(" custom ".into()), "m"), "custom");
    }

    #[test]
    fn image_request_uses_fixed_parameters() {
        let cfg = CoreConfig::default();
        let request = cfg.image_request("draw".into());

        assert_eq!(request.model, "dall-e-3");
        assert_eq!(request.size, "1024x1024");
        assert_eq!(request.quality, "standard");
        assert_eq!(request.count, 1);
        assert_eq!(request.response_format, "b64_json");
    }

    #[test]
    fn text_request_uses_text_model() {
        let cfg = CoreConfig::new("gpt-test".into(), "img-test".into()).unwrap();
        let request = cfg.text_request("hello".into());
        assert_eq!(request.model, "gpt-test");
        assert_eq!(request.prompt, "hello");
    }
}
