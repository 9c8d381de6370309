//! Worksheet and text-activity prompt construction.
//!
//! A worksheet prompt is always the base profile block followed by one activity-specific
//! suffix. Known activity types have hand-authored suffixes; any other topic gets a generic
//! suffix that quotes the topic verbatim.

use crate::constants::IMAGE_PROMPT_PREFIX;
use crate::context::{self, ContextFormatter};
use crate::profile::ChildProfile;
use crate::validation::Topic;
use crate::WorksheetResult;

/// Activity types with a dedicated worksheet template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KnownActivity {
    CvcBlending,
    AlphabetTracing,
    LineTracing,
    ShapeTracing,
    WritingPractice,
}

impl KnownActivity {
    pub const ALL: &'static [KnownActivity] = &[
        KnownActivity::CvcBlending,
        KnownActivity::AlphabetTracing,
        KnownActivity::LineTracing,
        KnownActivity::ShapeTracing,
        KnownActivity::WritingPractice,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KnownActivity::CvcBlending => "CVC Blending",
            KnownActivity::AlphabetTracing => "Alphabet Tracing",
            KnownActivity::LineTracing => "Line Tracing",
            KnownActivity::ShapeTracing => "Shape Tracing",
            KnownActivity::WritingPractice => "Writing Practice",
        }
    }

    /// Exact, case-sensitive label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|known| known.label() == label)
    }

    fn worksheet_template(self) -> &'static str {
        match self {
            KnownActivity::CvcBlending => CVC_BLENDING_TEMPLATE,
            KnownActivity::AlphabetTracing => {
                "Generate an alphabet tracing worksheet (uppercase + lowercase) with simple related objects and dotted lines to trace."
            }
            KnownActivity::LineTracing => {
                "Generate a line tracing worksheet with straight, zigzag, curved, and wavy lines."
            }
            KnownActivity::ShapeTracing => {
                "Generate a shape tracing worksheet with square, circle, triangle, star, heart, etc., with labels and dashed lines."
            }
            KnownActivity::WritingPractice => {
                "Generate a handwriting practice worksheet with large model letters/numbers and multiple rows of dotted traceable characters."
            }
        }
    }
}

const CVC_BLENDING_TEMPLATE: &str = "\
Create a black-and-white, sensory-friendly phonics worksheet focused on CVC word blending.
Include:
- A clear name header line: \u{201c}Name: ___________\u{201d}
- A short, simple instruction: \u{201c}Read the sounds. Blend the word.\u{201d}
- A table with 4 columns and 3 rows.
- Each cell should contain:
    \u{2022} One CVC word (e.g., tap, gap, cap, mop, dog, sun, bed, lip)
    \u{2022} The word should be in large, clear font.
- Use only beginner-level CVC words.
- Avoid pictures unless explicitly requested.
- Keep layout low-visual-clutter for ASD-friendly processing.";

const BASE_PREAMBLE: &str =
    "You are an AI that generates sensory-friendly worksheets for children with ASD.";

const DESIGN_RULES: &str = "\
Follow ASD-friendly design:
- Black & white only
- Thick outlines, minimal details
- Structured and predictable layout
- Very simple instructions
- Wide spacing
";

/// The resolved key for prompt construction.
///
/// Either one of the [`KnownActivity`] templates or a free-text custom topic. Both carry a
/// non-empty label, so an empty activity type cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Known(KnownActivity),
    Custom(Topic),
}

impl ActivityType {
    /// Parses a label, matching known templates exactly and treating anything else as a custom
    /// topic. Surrounding whitespace is trimmed first.
    ///
    /// # Errors
    ///
    /// Returns [`WorksheetError::MissingInput`](crate::WorksheetError::MissingInput) if the label
    /// is empty or whitespace-only.
    pub fn parse(label: &str) -> WorksheetResult<Self> {
        let topic = Topic::new(label)?;
        Ok(match KnownActivity::from_label(topic.as_str()) {
            Some(known) => ActivityType::Known(known),
            None => ActivityType::Custom(topic),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            ActivityType::Known(known) => known.label(),
            ActivityType::Custom(topic) => topic.as_str(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ActivityType::Custom(_))
    }
}

impl From<KnownActivity> for ActivityType {
    fn from(known: KnownActivity) -> Self {
        ActivityType::Known(known)
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// Base profile block plus the activity-specific suffix.
    pub fn build_worksheet_prompt(activity: &ActivityType, profile: &ChildProfile) -> String {
        let mut prompt = Self::base_profile(profile);
        match activity {
            ActivityType::Known(known) => prompt.push_str(known.worksheet_template()),
            ActivityType::Custom(topic) => prompt.push_str(&custom_template(topic)),
        }
        prompt
    }

    /// The prompt sent to the image model: a fixed lead sentence and the worksheet prompt.
    pub fn build_image_prompt(activity: &ActivityType, profile: &ChildProfile) -> String {
        format!(
            "{IMAGE_PROMPT_PREFIX}{}",
            Self::build_worksheet_prompt(activity, profile)
        )
    }

    /// Short instruction for the text model. Only the child's age is taken from the profile.
    pub fn build_text_activity_prompt(activity: &ActivityType, age: Option<u8>) -> String {
        format!(
            "You are an expert SPED teacher.
Create an autism-friendly worksheet activity for a child age {age}.
Topic: {topic}

Include:
- clear instructions
- 3 to 5 items
- simple, encouraging tone
- very child-friendly language
",
            age = context::age(age),
            topic = activity.label(),
        )
    }

    fn base_profile(profile: &ChildProfile) -> String {
        format!(
            "{BASE_PREAMBLE}\n\n{}\n{DESIGN_RULES}",
            ContextFormatter::worksheet_profile(profile)
        )
    }
}

fn custom_template(topic: &Topic) -> String {
    format!(
        "
Generate a sensory-friendly worksheet based on this topic:
\"{topic}\"

Requirements:
- Black & white only
- Simple illustrations
- Very simple instructions
- Structured layout
- Header: \"Name: ________\"
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CommunicationLevel, LearningStyle, SensitivityLevel};
    use crate::WorksheetError;

    fn profile() -> ChildProfile {
        ChildProfile {
            name: "Mia".into(),
            age: Some(6),
            learning_style: Some(LearningStyle::Kinesthetic),
            behavioral_notes: "Prefers short tasks".into(),
            interests: "Trains".into(),
            sensitivity_level: Some(SensitivityLevel::Medium),
            communication_level: Some(CommunicationLevel::FullSentences),
            ..ChildProfile::default()
        }
    }

    #[test]
    fn parse_matches_known_labels_exactly() {
        for known in KnownActivity::ALL {
            assert_eq!(
                ActivityType::parse(known.label()).unwrap(),
                ActivityType::Known(*known)
            );
        }
        assert!(ActivityType::parse("cvc blending").unwrap().is_custom());
        assert_eq!(
            ActivityType::parse("  Line Tracing ").unwrap(),
            ActivityType::Known(KnownActivity::LineTracing)
        );
    }

    #[test]
    fn parse_rejects_blank_labels() {
        assert!(matches!(
            ActivityType::parse("   "),
            Err(WorksheetError::MissingInput(_))
        ));
    }

    #[test]
    fn known_templates_follow_base_block() {
        let profile = profile();
        for known in KnownActivity::ALL {
            let prompt = PromptBuilder::build_worksheet_prompt(&(*known).into(), &profile);
            let suffix = known.worksheet_template();

            assert!(prompt.ends_with(suffix), "{} suffix missing", known.label());
            let base = &prompt[..prompt.len() - suffix.len()];
            assert!(base.starts_with(BASE_PREAMBLE));
            assert!(base.contains("- Age: 6\n"));
            assert!(base.contains("- Learning Style: Kinesthetic\n"));
            assert!(base.contains("- Behavioral Notes: Prefers short tasks\n"));
            assert!(base.contains("- Strengths & Interests: Trains\n"));
            assert!(base.contains("- Sensory Sensitivity: Medium\n"));
            assert!(base.contains("- Communication Level: Full Sentences\n"));
            assert!(base.contains("- Black & white only\n"));
            assert!(base.contains("- Thick outlines, minimal details\n"));
            assert!(base.contains("- Wide spacing\n"));
        }
    }

    #[test]
    fn cvc_template_describes_blending_table() {
        let prompt = PromptBuilder::build_worksheet_prompt(
            &KnownActivity::CvcBlending.into(),
            &profile(),
        );
        assert!(prompt.contains("focused on CVC word blending"));
        assert!(prompt.contains("A table with 4 columns and 3 rows."));
    }

    #[test]
    fn unknown_topic_falls_back_to_generic_template() {
        let activity = ActivityType::parse("Dinosaurs").unwrap();
        let prompt = PromptBuilder::build_worksheet_prompt(&activity, &profile());

        assert!(prompt.contains("\"Dinosaurs\""));
        assert!(prompt.contains("Generate a sensory-friendly worksheet based on this topic:"));
        assert!(prompt.contains("- Simple illustrations\n"));
        assert!(prompt.contains("- Header: \"Name: ________\"\n"));
        for known in KnownActivity::ALL {
            assert!(!prompt.contains(known.worksheet_template()));
        }
    }

    #[test]
    fn worksheet_prompt_is_deterministic() {
        let activity = ActivityType::parse("Personal Hygiene").unwrap();
        let profile = profile();
        assert_eq!(
            PromptBuilder::build_worksheet_prompt(&activity, &profile),
            PromptBuilder::build_worksheet_prompt(&activity, &profile)
        );
    }

    #[test]
    fn image_prompt_prefixes_worksheet_prompt() {
        let activity = ActivityType::from(KnownActivity::ShapeTracing);
        let image = PromptBuilder::build_image_prompt(&activity, &profile());
        let worksheet = PromptBuilder::build_worksheet_prompt(&activity, &profile());
        assert_eq!(image, format!("{IMAGE_PROMPT_PREFIX}{worksheet}"));
    }

    #[test]
    fn text_prompt_embeds_topic_and_age_only() {
        let activity = ActivityType::parse("Daily Routines").unwrap();
        let prompt = PromptBuilder::build_text_activity_prompt(&activity, Some(8));

        assert!(prompt.starts_with("You are an expert SPED teacher."));
        assert!(prompt.contains("for a child age 8."));
        assert!(prompt.contains("Topic: Daily Routines\n"));
        assert!(prompt.contains("- 3 to 5 items\n"));
        assert!(!prompt.contains("Learning Style"));

        let without_age = PromptBuilder::build_text_activity_prompt(&activity, None);
        assert!(without_age.contains("for a child age Not specified."));
    }
}
