//! Enumerated profile options.
//!
//! Each single-choice profile field is backed by one of these enums. The first variant of every
//! enum is the field's default, matching the index-0 selection of the original form controls.

use crate::session::SessionValue;
use crate::{WorksheetError, WorksheetResult};

/// A single-choice option with a fixed display label.
pub trait ProfileOption: Sized + Copy + 'static {
    /// Every option, in display order.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Matches a label exactly, falling back to an ASCII case-insensitive comparison.
    fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.label() == value)
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label().eq_ignore_ascii_case(value))
            })
    }
}

macro_rules! profile_option {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Display labels, in the same order as [`ProfileOption::ALL`].
            pub const LABELS: &'static [&'static str] = &[$($label),+];
        }

        impl ProfileOption for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as ProfileOption>::ALL[0]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

profile_option! {
    Gender {
        Male => "Male",
        Female => "Female",
        PreferNotToSay => "Prefer not to say",
    }
}

profile_option! {
    /// Primary way the child communicates.
    CommunicationMethod {
        Verbal => "Verbal",
        Gestures => "Gestures",
        AacDevice => "AAC Device",
        Pecs => "PECS",
        Mixed => "Mixed",
    }
}

profile_option! {
    LearningStyle {
        Visual => "Visual",
        Auditory => "Auditory",
        Kinesthetic => "Kinesthetic",
        MultiSensory => "Multi-sensory",
        Mixed => "Mixed",
    }
}

profile_option! {
    AcademicLevel {
        Preschool => "Preschool",
        Kindergarten => "Kindergarten",
        Grade1 => "Grade 1",
        Grade2 => "Grade 2",
        Grade3Plus => "Grade 3+",
    }
}

profile_option! {
    /// Overall sensory sensitivity.
    SensitivityLevel {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

profile_option! {
    /// Expressive communication level used in worksheet prompts.
    CommunicationLevel {
        NonVerbal => "Non-verbal",
        BasicWords => "Basic Words",
        FullSentences => "Full Sentences",
    }
}

profile_option! {
    /// Top-level activity category chosen before an activity subtype.
    ActivityFocus {
        Cognitive => "Cognitive",
        SelfHelp => "Self-Help",
    }
}

impl ActivityFocus {
    /// Reads a focus from raw session state.
    ///
    /// A one-element list is unwrapped first. `null`, blank strings and empty lists mean no
    /// focus has been chosen and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`WorksheetError::UnknownFocus`] if the label is not a known focus area.
    /// - [`WorksheetError::FieldShape`] for numbers or multi-element lists.
    pub fn from_session_value(value: &SessionValue) -> WorksheetResult<Option<Self>> {
        if matches!(value, SessionValue::List(items) if items.len() == 1) {
            tracing::debug!("activity_focus held a one-element list; unwrapping to scalar");
        }
        let value = value.clone().into_scalar();
        if value.is_blank() {
            return Ok(None);
        }
        match value {
            SessionValue::Text(s) => Self::from_label(s.trim())
                .map(Some)
                .ok_or(WorksheetError::UnknownFocus(s)),
            _ => Err(WorksheetError::FieldShape {
                field: "activity_focus",
                expected: "a single focus area",
            }),
        }
    }
}

/// Suggested values for `current_therapies`.
pub const THERAPY_OPTIONS: &[&str] = &[
    "Occupational Therapy",
    "Speech Therapy",
    "ABA",
    "SPED",
    "Shadow Teacher",
    "Others",
];

/// Suggested values for `communication_challenges`.
pub const COMMUNICATION_CHALLENGE_OPTIONS: &[&str] = &[
    "Echolalia",
    "Delayed response time",
    "Difficulty initiating conversation",
];

/// Suggested values for `sensory_sensitivities`.
pub const SENSORY_SENSITIVITY_OPTIONS: &[&str] =
    &["Sound", "Light", "Touch", "Movement", "Crowds/Visual clutter"];

/// Suggested values for `sensory_needs`.
pub const SENSORY_NEED_OPTIONS: &[&str] = &[
    "Weighted items",
    "Movement breaks",
    "Chewelry",
    "Noise-cancelling headphones",
];

/// Suggested values for `calming_strategies`.
pub const CALMING_STRATEGY_OPTIONS: &[&str] =
    &["Deep pressure", "Fidget toys", "Visual timer", "Soft music"];
