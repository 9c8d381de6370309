//! Worksheet service.
//!
//! Builds prompts for a resolved activity and hands them to the configured
//! [`GenerationClient`]. Each action makes exactly one external call; a failure is logged once
//! and returned as [`WorksheetError::Generation`] without retry.

use crate::artifact::WorksheetImage;
use crate::config::CoreConfig;
use crate::generation::GenerationClient;
use crate::profile::ChildProfile;
use crate::prompt::{ActivityType, PromptBuilder};
use crate::{WorksheetError, WorksheetResult};
use std::sync::Arc;

/// Every prompt derived from one activity selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorksheetPrompts {
    pub activity_type: String,
    pub worksheet: String,
    pub image: String,
    pub text: String,
}

/// Generated activity instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextActivity {
    pub activity_type: String,
    pub text: String,
}

/// Worksheet generation operations - no API concerns
#[derive(Clone)]
pub struct WorksheetService {
    cfg: Arc<CoreConfig>,
    client: Arc<dyn GenerationClient>,
}

impl WorksheetService {
    pub fn new(cfg: Arc<CoreConfig>, client: Arc<dyn GenerationClient>) -> Self {
        Self { cfg, client }
    }

    /// Builds the worksheet, image and text prompts without calling the service.
    pub fn prompts(&self, profile: &ChildProfile, activity: &ActivityType) -> WorksheetPrompts {
        WorksheetPrompts {
            activity_type: activity.label().to_owned(),
            worksheet: PromptBuilder::build_worksheet_prompt(activity, profile),
            image: PromptBuilder::build_image_prompt(activity, profile),
            text: PromptBuilder::build_text_activity_prompt(activity, profile.age),
        }
    }

    /// Generates child-friendly activity instructions for `activity`.
    ///
    /// # Errors
    ///
    /// Returns [`WorksheetError::Generation`] if the text service call fails.
    pub async fn generate_text_activity(
        &self,
        profile: &ChildProfile,
        activity: &ActivityType,
    ) -> WorksheetResult<TextActivity> {
        let prompt = PromptBuilder::build_text_activity_prompt(activity, profile.age);
        let request = self.cfg.text_request(prompt);

        tracing::info!(activity = %activity, model = %request.model, "generating activity text");
        let text = self.client.complete_text(&request).await.map_err(|e| {
            tracing::error!("Error generating activity text: {}", e);
            WorksheetError::Generation(e)
        })?;

        Ok(TextActivity {
            activity_type: activity.label().to_owned(),
            text,
        })
    }

    /// Generates a printable worksheet image for `activity`.
    ///
    /// # Errors
    ///
    /// Returns [`WorksheetError::Generation`] if the image service call fails.
    pub async fn generate_worksheet_image(
        &self,
        profile: &ChildProfile,
        activity: &ActivityType,
    ) -> WorksheetResult<WorksheetImage> {
        let prompt = PromptBuilder::build_image_prompt(activity, profile);
        let request = self.cfg.image_request(prompt);

        tracing::info!(activity = %activity, model = %request.model, "generating worksheet image");
        let bytes = self.client.generate_image(&request).await.map_err(|e| {
            tracing::error!("Error during image generation: {}", e);
            WorksheetError::Generation(e)
        })?;

        Ok(WorksheetImage::new(activity, bytes))
    }
}
