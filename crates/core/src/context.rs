//! Human-readable rendering of a child profile for inclusion in prompts.

use crate::constants::MISSING_VALUE_PLACEHOLDER;
use crate::profile::{ChildProfile, ProfileOption};
use std::collections::BTreeSet;

/// Renders a [`ChildProfile`] as fixed-structure text blocks.
///
/// Output is deterministic for a given profile. Every missing or empty value is rendered as
/// [`MISSING_VALUE_PLACEHOLDER`].
pub struct ContextFormatter;

impl ContextFormatter {
    /// Full profile context block with five sections.
    pub fn format(profile: &ChildProfile) -> String {
        let mut out = String::new();

        out.push_str("Child Profile:\n");
        out.push_str(&format!("- Name: {}\n", text(&profile.name)));
        out.push_str(&format!("- Age: {}\n", age(profile.age)));
        out.push_str(&format!("- Learning Style: {}\n", option(profile.learning_style)));
        out.push_str(&format!("- Academic Level: {}\n", option(profile.academic_level)));
        out.push('\n');
        out.push_str("Behavioral Information:\n");
        out.push_str(&format!("- Notes: {}\n", text(&profile.behavioral_notes)));
        out.push('\n');
        out.push_str("Strengths & Interests:\n");
        out.push_str(&format!("- Strengths: {}\n", text(&profile.strengths)));
        out.push_str(&format!("- Interests: {}\n", text(&profile.interests)));
        out.push('\n');
        out.push_str("Sensory Profile:\n");
        out.push_str(&format!("- Sensitivity Level: {}\n", option(profile.sensitivity_level)));
        out.push_str(&format!("- Triggers: {}\n", text(&profile.sensory_triggers)));
        out.push_str(&format!("- Sensitivities: {}\n", tags(&profile.sensory_sensitivities)));
        out.push('\n');
        out.push_str("Communication Profile:\n");
        out.push_str(&format!("- Level: {}\n", option(profile.communication_level)));
        out.push_str(&format!("- Methods: {}\n", text(&profile.communication_methods)));

        out
    }

    /// The compact profile summary embedded at the top of every worksheet prompt.
    pub fn worksheet_profile(profile: &ChildProfile) -> String {
        let mut out = String::new();

        out.push_str("Child Profile:\n");
        out.push_str(&format!("- Age: {}\n", age(profile.age)));
        out.push_str(&format!("- Learning Style: {}\n", option(profile.learning_style)));
        out.push_str(&format!("- Behavioral Notes: {}\n", text(&profile.behavioral_notes)));
        out.push_str(&format!("- Strengths & Interests: {}\n", text(&profile.interests)));
        out.push_str(&format!("- Sensory Sensitivity: {}\n", option(profile.sensitivity_level)));
        out.push_str(&format!("- Communication Level: {}\n", option(profile.communication_level)));

        out
    }
}

pub(crate) fn text(value: &str) -> &str {
    if value.trim().is_empty() {
        MISSING_VALUE_PLACEHOLDER
    } else {
        value.trim()
    }
}

pub(crate) fn age(value: Option<u8>) -> String {
    value
        .map(|age| age.to_string())
        .unwrap_or_else(|| MISSING_VALUE_PLACEHOLDER.to_owned())
}

fn option<T: ProfileOption>(value: Option<T>) -> &'static str {
    value
        .map(|option| option.label())
        .unwrap_or(MISSING_VALUE_PLACEHOLDER)
}

fn tags(values: &BTreeSet<String>) -> String {
    if values.is_empty() {
        MISSING_VALUE_PLACEHOLDER.to_owned()
    } else {
        values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CommunicationLevel, LearningStyle, SensitivityLevel};

    fn sample_profile() -> ChildProfile {
        ChildProfile {
            name: "Mia".into(),
            age: Some(7),
            learning_style: Some(LearningStyle::Visual),
            behavioral_notes: "Needs movement breaks".into(),
            strengths: "Puzzles".into(),
            interests: "Dinosaurs".into(),
            sensitivity_level: Some(SensitivityLevel::High),
            sensory_sensitivities: ["Sound".to_owned(), "Light".to_owned()].into(),
            communication_level: Some(CommunicationLevel::BasicWords),
            ..ChildProfile::default()
        }
    }

    #[test]
    fn format_renders_all_sections_in_order() {
        let context = ContextFormatter::format(&sample_profile());

        let sections = [
            "Child Profile:",
            "Behavioral Information:",
            "Strengths & Interests:",
            "Sensory Profile:",
            "Communication Profile:",
        ];
        let mut last = 0;
        for section in sections {
            let at = context[last..]
                .find(section)
                .unwrap_or_else(|| panic!("missing section {section}"));
            last += at;
        }

        assert!(context.contains("- Name: Mia\n"));
        assert!(context.contains("- Age: 7\n"));
        assert!(context.contains("- Interests: Dinosaurs\n"));
        assert!(context.contains("- Sensitivities: Light, Sound\n"));
        assert!(context.contains("- Level: Basic Words\n"));
    }

    #[test]
    fn missing_values_use_one_placeholder() {
        let context = ContextFormatter::format(&ChildProfile::default());

        assert!(context.contains("- Name: Not specified\n"));
        assert!(context.contains("- Age: Not specified\n"));
        assert!(context.contains("- Academic Level: Not specified\n"));
        assert!(context.contains("- Methods: Not specified\n"));
        assert!(!context.contains("None"));
        assert!(!context.contains("N/A"));
    }

    #[test]
    fn worksheet_profile_uses_interests_for_strengths_line() {
        let block = ContextFormatter::worksheet_profile(&sample_profile());
        assert!(block.contains("- Strengths & Interests: Dinosaurs\n"));
        assert!(block.contains("- Sensory Sensitivity: High\n"));
        assert!(!block.contains("Name"));
    }

    #[test]
    fn format_is_deterministic() {
        let profile = sample_profile();
        assert_eq!(
            ContextFormatter::format(&profile),
            ContextFormatter::format(&profile)
        );
    }
}
