//! Profile field catalogue.
//!
//! Every profile field has a stable session key, a kind that decides how incoming values are
//! normalised, and a type-appropriate default so no field is ever undefined.

use super::options::{
    AcademicLevel, ActivityFocus, CommunicationLevel, CommunicationMethod, Gender,
    LearningStyle, SensitivityLevel, CALMING_STRATEGY_OPTIONS, COMMUNICATION_CHALLENGE_OPTIONS,
    SENSORY_NEED_OPTIONS, SENSORY_SENSITIVITY_OPTIONS, THERAPY_OPTIONS,
};
use crate::session::SessionValue;
use crate::validation::{parse_profile_date, validate_child_age};
use crate::{WorksheetError, WorksheetResult};
use std::collections::BTreeSet;

/// How a field's values are shaped and validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text; any string is accepted, including empty.
    Text,
    /// Whole number in `1..=18`, or unset.
    Age,
    /// ISO `YYYY-MM-DD` date, or empty.
    Date,
    /// One of a fixed set of labels, or empty.
    Choice(&'static [&'static str]),
    /// Unordered set of strings without duplicates.
    Tags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileField {
    // Identity
    ChildName,
    ChildAge,
    ChildBirthday,
    ChildGender,
    ParentName,
    ParentContact,
    // Diagnosis
    Diagnosis,
    DiagnosisDate,
    DiagnosedBy,
    CurrentTherapies,
    // Communication
    CommunicationMethod,
    ExpressiveLevel,
    ReceptiveLevel,
    CommunicationChallenges,
    CommLevel,
    CommMethods,
    // Sensory
    SensorySensitivities,
    SensoryNeeds,
    CalmingStrategies,
    SensoryProfile,
    SensoryTriggers,
    // Strengths & interests
    ChildStrengths,
    ChildInterests,
    // Behaviour
    BehaviorTriggers,
    BehaviorManagement,
    BehavioralNotes,
    // Learning
    LearningStyle,
    AcademicFocus,
    AcademicLevel,
    // Routines
    RoutineMorning,
    RoutineSchool,
    RoutineBedtime,
    EatingNotes,
    // Safety
    Allergies,
    EmergencyContact,
    SafetyConcerns,

    ActivityFocus,
}

impl ProfileField {
    pub const ALL: &'static [ProfileField] = &[
        ProfileField::ChildName,
        ProfileField::ChildAge,
        ProfileField::ChildBirthday,
        ProfileField::ChildGender,
        ProfileField::ParentName,
        ProfileField::ParentContact,
        ProfileField::Diagnosis,
        ProfileField::DiagnosisDate,
        ProfileField::DiagnosedBy,
        ProfileField::CurrentTherapies,
        ProfileField::CommunicationMethod,
        ProfileField::ExpressiveLevel,
        ProfileField::ReceptiveLevel,
        ProfileField::CommunicationChallenges,
        ProfileField::CommLevel,
        ProfileField::CommMethods,
        ProfileField::SensorySensitivities,
        ProfileField::SensoryNeeds,
        ProfileField::CalmingStrategies,
        ProfileField::SensoryProfile,
        ProfileField::SensoryTriggers,
        ProfileField::ChildStrengths,
        ProfileField::ChildInterests,
        ProfileField::BehaviorTriggers,
        ProfileField::BehaviorManagement,
        ProfileField::BehavioralNotes,
        ProfileField::LearningStyle,
        ProfileField::AcademicFocus,
        ProfileField::AcademicLevel,
        ProfileField::RoutineMorning,
        ProfileField::RoutineSchool,
        ProfileField::RoutineBedtime,
        ProfileField::EatingNotes,
        ProfileField::Allergies,
        ProfileField::EmergencyContact,
        ProfileField::SafetyConcerns,
        ProfileField::ActivityFocus,
    ];

    /// Session key for this field.
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::ChildName => "child_name",
            ProfileField::ChildAge => "child_age",
            ProfileField::ChildBirthday => "child_birthday",
            ProfileField::ChildGender => "child_gender",
            ProfileField::ParentName => "parent_name",
            ProfileField::ParentContact => "parent_contact",
            ProfileField::Diagnosis => "diagnosis",
            ProfileField::DiagnosisDate => "diagnosis_date",
            ProfileField::DiagnosedBy => "diagnosed_by",
            ProfileField::CurrentTherapies => "current_therapies",
            ProfileField::CommunicationMethod => "communication_method",
            ProfileField::ExpressiveLevel => "expressive_level",
            ProfileField::ReceptiveLevel => "receptive_level",
            ProfileField::CommunicationChallenges => "communication_challenges",
            ProfileField::CommLevel => "comm_level",
            ProfileField::CommMethods => "comm_methods",
            ProfileField::SensorySensitivities => "sensory_sensitivities",
            ProfileField::SensoryNeeds => "sensory_needs",
            ProfileField::CalmingStrategies => "calming_strategies",
            ProfileField::SensoryProfile => "sensory_profile",
            ProfileField::SensoryTriggers => "sensory_triggers",
            ProfileField::ChildStrengths => "child_strengths",
            ProfileField::ChildInterests => "child_interests",
            ProfileField::BehaviorTriggers => "behavior_triggers",
            ProfileField::BehaviorManagement => "behavior_management",
            ProfileField::BehavioralNotes => "behavioral_notes",
            ProfileField::LearningStyle => "learning_style",
            ProfileField::AcademicFocus => "academic_focus",
            ProfileField::AcademicLevel => "academic_level",
            ProfileField::RoutineMorning => "routine_morning",
            ProfileField::RoutineSchool => "routine_school",
            ProfileField::RoutineBedtime => "routine_bedtime",
            ProfileField::EatingNotes => "eating_notes",
            ProfileField::Allergies => "allergies",
            ProfileField::EmergencyContact => "emergency_contact",
            ProfileField::SafetyConcerns => "safety_concerns",
            ProfileField::ActivityFocus => "activity_focus",
        }
    }

    /// Looks a field up by session key.
    ///
    /// `child_activity` is accepted as an alias for `activity_focus`.
    pub fn from_key(key: &str) -> Option<Self> {
        if key == "child_activity" {
            return Some(ProfileField::ActivityFocus);
        }
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            ProfileField::ChildAge => FieldKind::Age,
            ProfileField::ChildBirthday | ProfileField::DiagnosisDate => FieldKind::Date,
            ProfileField::ChildGender => FieldKind::Choice(Gender::LABELS),
            ProfileField::CommunicationMethod => FieldKind::Choice(CommunicationMethod::LABELS),
            ProfileField::CommLevel => FieldKind::Choice(CommunicationLevel::LABELS),
            ProfileField::SensoryProfile => FieldKind::Choice(SensitivityLevel::LABELS),
            ProfileField::LearningStyle => FieldKind::Choice(LearningStyle::LABELS),
            ProfileField::AcademicLevel => FieldKind::Choice(AcademicLevel::LABELS),
            ProfileField::ActivityFocus => FieldKind::Choice(ActivityFocus::LABELS),
            ProfileField::CurrentTherapies
            | ProfileField::CommunicationChallenges
            | ProfileField::SensorySensitivities
            | ProfileField::SensoryNeeds
            | ProfileField::CalmingStrategies => FieldKind::Tags,
            _ => FieldKind::Text,
        }
    }

    /// Labels offered for a choice or tag field, in menu order. Empty for other kinds.
    pub fn options(self) -> &'static [&'static str] {
        match (self, self.kind()) {
            (_, FieldKind::Choice(options)) => options,
            (ProfileField::CurrentTherapies, _) => THERAPY_OPTIONS,
            (ProfileField::CommunicationChallenges, _) => COMMUNICATION_CHALLENGE_OPTIONS,
            (ProfileField::SensorySensitivities, _) => SENSORY_SENSITIVITY_OPTIONS,
            (ProfileField::SensoryNeeds, _) => SENSORY_NEED_OPTIONS,
            (ProfileField::CalmingStrategies, _) => CALMING_STRATEGY_OPTIONS,
            _ => &[],
        }
    }

    /// The value a fresh session holds for this field.
    pub fn default_value(self) -> SessionValue {
        match self.kind() {
            FieldKind::Text | FieldKind::Date => SessionValue::Text(String::new()),
            FieldKind::Age => SessionValue::Null,
            FieldKind::Choice(options) => SessionValue::text(options[0]),
            FieldKind::Tags => SessionValue::List(Vec::new()),
        }
    }

    /// Coerces an incoming value into this field's canonical stored shape.
    ///
    /// Scalar fields unwrap one-element lists. Choice labels are canonicalised, dates are
    /// re-rendered as `YYYY-MM-DD`, and tag lists are trimmed, de-duplicated and sorted.
    ///
    /// # Errors
    ///
    /// - [`WorksheetError::FieldShape`] if the value has the wrong shape for the field.
    /// - [`WorksheetError::AgeOutOfRange`] if `child_age` is outside `1..=18`.
    /// - [`WorksheetError::UnknownOption`] if a choice label is not recognised.
    /// - [`WorksheetError::InvalidInput`] if a date does not parse.
    pub fn normalise(self, value: SessionValue) -> WorksheetResult<SessionValue> {
        let field = self.key();
        match self.kind() {
            FieldKind::Tags => normalise_tags(field, value).map(SessionValue::List),
            FieldKind::Text => match value.into_scalar() {
                SessionValue::Null => Ok(SessionValue::Text(String::new())),
                SessionValue::Integer(n) => Ok(SessionValue::Text(n.to_string())),
                SessionValue::Text(s) => Ok(SessionValue::Text(s)),
                SessionValue::List(_) => Err(WorksheetError::FieldShape {
                    field,
                    expected: "a single text value",
                }),
            },
            FieldKind::Age => match scalar_text(field, value)? {
                None => Ok(SessionValue::Null),
                Some(raw) => {
                    let age = raw
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| WorksheetError::FieldShape {
                            field,
                            expected: "a whole number",
                        })?;
                    Ok(SessionValue::Integer(i64::from(validate_child_age(age)?)))
                }
            },
            FieldKind::Date => match scalar_text(field, value)? {
                None => Ok(SessionValue::Text(String::new())),
                Some(raw) => {
                    let date = parse_profile_date(field, &raw)?;
                    Ok(SessionValue::Text(date.format("%Y-%m-%d").to_string()))
                }
            },
            FieldKind::Choice(options) => match scalar_text(field, value)? {
                None => Ok(SessionValue::Text(String::new())),
                Some(raw) => canonical_option(options, &raw)
                    .map(SessionValue::text)
                    .ok_or(WorksheetError::UnknownOption { field, value: raw }),
            },
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Reduces a scalar value to its text, treating `null` and blank strings as unset.
fn scalar_text(field: &'static str, value: SessionValue) -> WorksheetResult<Option<String>> {
    match value.into_scalar() {
        SessionValue::Null => Ok(None),
        SessionValue::Integer(n) => Ok(Some(n.to_string())),
        SessionValue::Text(s) if s.trim().is_empty() => Ok(None),
        SessionValue::Text(s) => Ok(Some(s)),
        SessionValue::List(items) if items.is_empty() => Ok(None),
        SessionValue::List(_) => Err(WorksheetError::FieldShape {
            field,
            expected: "a single value",
        }),
    }
}

fn normalise_tags(field: &'static str, value: SessionValue) -> WorksheetResult<Vec<String>> {
    let items = match value {
        SessionValue::Null => Vec::new(),
        SessionValue::Text(s) => vec![s],
        SessionValue::List(items) => items,
        SessionValue::Integer(_) => {
            return Err(WorksheetError::FieldShape {
                field,
                expected: "a list of strings",
            })
        }
    };

    let set: BTreeSet<String> = items
        .into_iter()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect();
    Ok(set.into_iter().collect())
}

fn canonical_option(options: &'static [&'static str], raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    options
        .iter()
        .copied()
        .find(|option| *option == raw)
        .or_else(|| {
            options
                .iter()
                .copied()
                .find(|option| option.eq_ignore_ascii_case(raw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_and_round_trip() {
        let keys: BTreeSet<&str> = ProfileField::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys.len(), ProfileField::ALL.len());

        for field in ProfileField::ALL {
            assert_eq!(ProfileField::from_key(field.key()), Some(*field));
        }
    }

    #[test]
    fn child_activity_is_an_alias_for_focus() {
        assert_eq!(
            ProfileField::from_key("child_activity"),
            Some(ProfileField::ActivityFocus)
        );
        assert_eq!(ProfileField::from_key("not_a_field"), None);
    }

    #[test]
    fn options_cover_choice_and_tag_fields() {
        assert_eq!(ProfileField::LearningStyle.options()[0], "Visual");
        assert!(ProfileField::CalmingStrategies.options().len() > 1);
        assert!(ProfileField::ChildName.options().is_empty());
        for field in ProfileField::ALL {
            let expects_options = matches!(field.kind(), FieldKind::Choice(_) | FieldKind::Tags);
            assert_eq!(!field.options().is_empty(), expects_options, "{}", field);
        }
    }

    #[test]
    fn defaults_match_field_kind() {
        assert_eq!(ProfileField::ChildName.default_value(), SessionValue::text(""));
        assert_eq!(ProfileField::ChildAge.default_value(), SessionValue::Null);
        assert_eq!(
            ProfileField::SensorySensitivities.default_value(),
            SessionValue::List(vec![])
        );
        assert_eq!(
            ProfileField::LearningStyle.default_value(),
            SessionValue::text("Visual")
        );
        assert_eq!(
            ProfileField::ActivityFocus.default_value(),
            SessionValue::text("Cognitive")
        );
    }

    #[test]
    fn age_accepts_numbers_and_numeric_strings() {
        assert_eq!(
            ProfileField::ChildAge.normalise(SessionValue::Integer(7)).unwrap(),
            SessionValue::Integer(7)
        );
        assert_eq!(
            ProfileField::ChildAge.normalise(SessionValue::text(" 12 ")).unwrap(),
            SessionValue::Integer(12)
        );
        assert_eq!(
            ProfileField::ChildAge.normalise(SessionValue::text("")).unwrap(),
            SessionValue::Null
        );
    }

    #[test]
    fn age_rejects_out_of_range_and_non_numeric() {
        assert!(matches!(
            ProfileField::ChildAge.normalise(SessionValue::Integer(25)),
            Err(WorksheetError::AgeOutOfRange(25))
        ));
        assert!(matches!(
            ProfileField::ChildAge.normalise(SessionValue::text("seven")),
            Err(WorksheetError::FieldShape { field: "child_age", .. })
        ));
    }

    #[test]
    fn tags_are_trimmed_deduplicated_and_sorted() {
        let value = ProfileField::SensorySensitivities
            .normalise(SessionValue::list(["Sound", " Light ", "Sound", ""]))
            .unwrap();
        assert_eq!(value, SessionValue::list(["Light", "Sound"]));
    }

    #[test]
    fn choice_is_canonicalised() {
        assert_eq!(
            ProfileField::CommLevel
                .normalise(SessionValue::text("basic words"))
                .unwrap(),
            SessionValue::text("Basic Words")
        );
        let err = ProfileField::CommLevel
            .normalise(SessionValue::text("Chatty"))
            .unwrap_err();
        assert!(matches!(
            err,
            WorksheetError::UnknownOption { field: "comm_level", .. }
        ));
    }

    #[test]
    fn scalar_fields_unwrap_singleton_lists() {
        assert_eq!(
            ProfileField::ActivityFocus
                .normalise(SessionValue::list(["Self-Help"]))
                .unwrap(),
            SessionValue::text("Self-Help")
        );
        assert!(matches!(
            ProfileField::ChildName.normalise(SessionValue::list(["a", "b"])),
            Err(WorksheetError::FieldShape { .. })
        ));
    }

    #[test]
    fn free_text_is_kept_verbatim() {
        assert_eq!(
            ProfileField::BehavioralNotes
                .normalise(SessionValue::text("  loud noises  "))
                .unwrap(),
            SessionValue::text("  loud noises  ")
        );
    }

    #[test]
    fn dates_are_canonicalised() {
        assert_eq!(
            ProfileField::ChildBirthday
                .normalise(SessionValue::text(" 2017-01-01 "))
                .unwrap(),
            SessionValue::text("2017-01-01")
        );
        assert!(ProfileField::DiagnosisDate
            .normalise(SessionValue::text("yesterday"))
            .is_err());
    }
}
