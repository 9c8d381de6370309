//! Constants used throughout the Ausome core crate.
//!
//! This module keeps prompt-facing literals and generation parameters in one place so the
//! REST layer, the CLI and the prompt builder agree on them.

/// Youngest age accepted for `child_age`.
pub const MIN_CHILD_AGE: u8 = 1;

/// Oldest age accepted for `child_age`.
pub const MAX_CHILD_AGE: u8 = 18;

/// Rendered in prompts and context blocks wherever a profile value is missing or empty.
pub const MISSING_VALUE_PLACEHOLDER: &str = "Not specified";

/// Default model for text activity generation.
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4.1-mini";

/// Default model for worksheet image generation.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Fixed worksheet image size.
pub const IMAGE_SIZE: &str = "1024x1024";

/// Fixed worksheet image quality.
pub const IMAGE_QUALITY: &str = "standard";

/// Number of images requested per worksheet.
pub const IMAGE_COUNT: u8 = 1;

/// Images are returned inline as base64 rather than as hosted URLs.
pub const IMAGE_RESPONSE_FORMAT: &str = "b64_json";

/// MIME type of downloadable worksheet artifacts.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Lead sentence prepended to every worksheet prompt sent to the image model.
pub const IMAGE_PROMPT_PREFIX: &str =
    "Black & white sensory-friendly worksheet for a child with ASD. ";
