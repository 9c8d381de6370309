//! Activity selection.
//!
//! Resolves the two-level menu choice (focus area, then activity subtype, then an optional
//! nested tracing choice or custom topic) into the [`ActivityType`] used for prompt
//! construction.

use crate::profile::{ActivityFocus, ProfileOption};
use crate::prompt::{ActivityType, KnownActivity};
use crate::session::SessionValue;
use crate::{WorksheetError, WorksheetResult};

/// Subtypes offered under [`ActivityFocus::Cognitive`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CognitiveSubtype {
    BasicReading,
    Shapes,
    Tracing,
    Custom,
}

impl CognitiveSubtype {
    pub const ALL: &'static [CognitiveSubtype] = &[
        CognitiveSubtype::BasicReading,
        CognitiveSubtype::Shapes,
        CognitiveSubtype::Tracing,
        CognitiveSubtype::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CognitiveSubtype::BasicReading => "Basic Reading (Phonics)",
            CognitiveSubtype::Shapes => "Shapes (Math)",
            CognitiveSubtype::Tracing => "Tracing (Writing)",
            CognitiveSubtype::Custom => "Other/Custom",
        }
    }
}

/// Subtypes offered under [`ActivityFocus::SelfHelp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelfHelpSubtype {
    PersonalHygiene,
    DailyRoutines,
    HouseholdSkills,
    Custom,
}

impl SelfHelpSubtype {
    pub const ALL: &'static [SelfHelpSubtype] = &[
        SelfHelpSubtype::PersonalHygiene,
        SelfHelpSubtype::DailyRoutines,
        SelfHelpSubtype::HouseholdSkills,
        SelfHelpSubtype::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SelfHelpSubtype::PersonalHygiene => "Personal Hygiene",
            SelfHelpSubtype::DailyRoutines => "Daily Routines",
            SelfHelpSubtype::HouseholdSkills => "Household Skills",
            SelfHelpSubtype::Custom => "Other/Custom Skill",
        }
    }
}

/// Nested choices under [`CognitiveSubtype::Tracing`]. The first entry is the default.
pub const TRACING_CHOICES: &[KnownActivity] = &[
    KnownActivity::LineTracing,
    KnownActivity::AlphabetTracing,
    KnownActivity::WritingPractice,
];

/// One generation action's menu selection. Never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivityRequest {
    pub focus: Option<ActivityFocus>,
    pub subtype: String,
    /// Only read when the subtype is tracing.
    pub tracing_focus: Option<String>,
    /// Only read when the subtype is a custom topic.
    pub custom_topic: Option<String>,
}

impl ActivityRequest {
    pub fn new(
        focus: Option<ActivityFocus>,
        subtype: impl Into<String>,
        custom_topic: Option<String>,
    ) -> Self {
        Self {
            focus,
            subtype: subtype.into(),
            tracing_focus: None,
            custom_topic,
        }
    }

    /// Builds a request from a raw session value for the focus.
    ///
    /// # Errors
    ///
    /// Returns an error if the focus value is not a recognised focus area; see
    /// [`ActivityFocus::from_session_value`].
    pub fn from_session_focus(
        focus: &SessionValue,
        subtype: impl Into<String>,
        custom_topic: Option<String>,
    ) -> WorksheetResult<Self> {
        Ok(Self::new(
            ActivityFocus::from_session_value(focus)?,
            subtype,
            custom_topic,
        ))
    }

    pub fn with_tracing_focus(mut self, tracing_focus: impl Into<String>) -> Self {
        self.tracing_focus = Some(tracing_focus.into());
        self
    }
}

pub struct ActivitySelector;

impl ActivitySelector {
    /// Resolves a menu selection to the canonical activity type.
    ///
    /// - Cognitive: basic reading maps to `CVC Blending`, shapes to `Shape Tracing`, tracing to
    ///   the nested tracing choice (default `Line Tracing`), custom to the trimmed topic.
    /// - Self-Help: the named skills are taken verbatim, custom to the trimmed topic.
    ///
    /// # Errors
    ///
    /// - [`WorksheetError::MissingInput`] if no focus is set, or a custom topic is empty.
    /// - [`WorksheetError::UnknownSubtype`] if the subtype is not offered under the focus.
    /// - [`WorksheetError::UnknownOption`] if the tracing choice is not recognised.
    pub fn resolve(request: &ActivityRequest) -> WorksheetResult<ActivityType> {
        let focus = request
            .focus
            .ok_or(WorksheetError::MissingInput("activity focus"))?;

        match focus {
            ActivityFocus::Cognitive => {
                let subtype = match_label(CognitiveSubtype::ALL, |s| s.label(), &request.subtype)
                    .ok_or_else(|| unknown_subtype(focus, &request.subtype))?;
                match subtype {
                    CognitiveSubtype::BasicReading => Ok(KnownActivity::CvcBlending.into()),
                    CognitiveSubtype::Shapes => Ok(KnownActivity::ShapeTracing.into()),
                    CognitiveSubtype::Tracing => {
                        resolve_tracing(request.tracing_focus.as_deref()).map(Into::into)
                    }
                    CognitiveSubtype::Custom => custom_topic(request),
                }
            }
            ActivityFocus::SelfHelp => {
                let subtype = match_label(SelfHelpSubtype::ALL, |s| s.label(), &request.subtype)
                    .ok_or_else(|| unknown_subtype(focus, &request.subtype))?;
                match subtype {
                    SelfHelpSubtype::Custom => custom_topic(request),
                    named => ActivityType::parse(named.label()),
                }
            }
        }
    }

    /// Subtype labels offered under a focus area, in menu order.
    pub fn subtype_labels(focus: ActivityFocus) -> Vec<&'static str> {
        match focus {
            ActivityFocus::Cognitive => CognitiveSubtype::ALL.iter().map(|s| s.label()).collect(),
            ActivityFocus::SelfHelp => SelfHelpSubtype::ALL.iter().map(|s| s.label()).collect(),
        }
    }

    /// Nested tracing labels, in menu order.
    pub fn tracing_labels() -> Vec<&'static str> {
        TRACING_CHOICES.iter().map(|t| t.label()).collect()
    }

    /// Every focus area with its subtype labels.
    pub fn menu() -> Vec<(ActivityFocus, Vec<&'static str>)> {
        ActivityFocus::ALL
            .iter()
            .map(|focus| (*focus, Self::subtype_labels(*focus)))
            .collect()
    }
}

/// Matches a menu label in full (`Basic Reading (Phonics)`) or in short form
/// (`Basic Reading`), ignoring ASCII case.
fn match_label<T: Copy>(
    options: &[T],
    label: impl Fn(T) -> &'static str,
    input: &str,
) -> Option<T> {
    let input = input.trim();
    options.iter().copied().find(|option| {
        let full = label(*option);
        let short = full.split(" (").next().unwrap_or(full);
        full.eq_ignore_ascii_case(input) || short.eq_ignore_ascii_case(input)
    })
}

fn resolve_tracing(choice: Option<&str>) -> WorksheetResult<KnownActivity> {
    match choice.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(TRACING_CHOICES[0]),
        Some(choice) => match_label(TRACING_CHOICES, |t| t.label(), choice).ok_or_else(|| {
            WorksheetError::UnknownOption {
                field: "tracing_focus",
                value: choice.to_owned(),
            }
        }),
    }
}

fn custom_topic(request: &ActivityRequest) -> WorksheetResult<ActivityType> {
    ActivityType::parse(request.custom_topic.as_deref().unwrap_or_default())
}

fn unknown_subtype(focus: ActivityFocus, subtype: &str) -> WorksheetError {
    WorksheetError::UnknownSubtype {
        focus: focus.label().to_owned(),
        subtype: subtype.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Topic;

    fn resolve(focus: ActivityFocus, subtype: &str, topic: Option<&str>) -> ActivityType {
        ActivitySelector::resolve(&ActivityRequest::new(
            Some(focus),
            subtype,
            topic.map(str::to_owned),
        ))
        .expect("selection should resolve")
    }

    #[test]
    fn cognitive_subtypes_map_to_templates() {
        assert_eq!(
            resolve(ActivityFocus::Cognitive, "Basic Reading (Phonics)", None),
            ActivityType::Known(KnownActivity::CvcBlending)
        );
        assert_eq!(
            resolve(ActivityFocus::Cognitive, "Shapes (Math)", None),
            ActivityType::Known(KnownActivity::ShapeTracing)
        );
        assert_eq!(
            resolve(ActivityFocus::Cognitive, "Basic Reading", None).label(),
            "CVC Blending"
        );
    }

    #[test]
    fn tracing_uses_nested_choice_and_defaults_to_line_tracing() {
        assert_eq!(
            resolve(ActivityFocus::Cognitive, "Tracing (Writing)", None),
            ActivityType::Known(KnownActivity::LineTracing)
        );

        for choice in TRACING_CHOICES {
            let request = ActivityRequest::new(Some(ActivityFocus::Cognitive), "Tracing", None)
                .with_tracing_focus(choice.label());
            assert_eq!(
                ActivitySelector::resolve(&request).unwrap(),
                ActivityType::Known(*choice)
            );
        }

        let request = ActivityRequest::new(Some(ActivityFocus::Cognitive), "Tracing", None)
            .with_tracing_focus("Dot Tracing");
        assert!(matches!(
            ActivitySelector::resolve(&request),
            Err(WorksheetError::UnknownOption { field: "tracing_focus", .. })
        ));
    }

    #[test]
    fn custom_topics_are_trimmed() {
        assert_eq!(
            resolve(
                ActivityFocus::SelfHelp,
                "Other/Custom Skill",
                Some("  Brushing Teeth  ")
            )
            .label(),
            "Brushing Teeth"
        );
        assert_eq!(
            resolve(ActivityFocus::Cognitive, "Other/Custom", Some(" Dinosaurs ")),
            ActivityType::Custom(Topic::new("Dinosaurs").unwrap())
        );
    }

    #[test]
    fn custom_topic_that_names_a_template_uses_the_template() {
        assert_eq!(
            resolve(ActivityFocus::Cognitive, "Other/Custom", Some("Writing Practice")),
            ActivityType::Known(KnownActivity::WritingPractice)
        );
    }

    #[test]
    fn blank_custom_topic_blocks_resolution() {
        for topic in [None, Some(""), Some("   ")] {
            let request = ActivityRequest::new(
                Some(ActivityFocus::SelfHelp),
                "Other/Custom Skill",
                topic.map(str::to_owned),
            );
            assert!(matches!(
                ActivitySelector::resolve(&request),
                Err(WorksheetError::MissingInput("activity topic"))
            ));
        }
    }

    #[test]
    fn self_help_skills_are_taken_verbatim() {
        for subtype in ["Personal Hygiene", "Daily Routines", "Household Skills"] {
            let resolved = resolve(ActivityFocus::SelfHelp, subtype, None);
            assert!(resolved.is_custom());
            assert_eq!(resolved.label(), subtype);
        }
    }

    #[test]
    fn missing_focus_fails() {
        let request = ActivityRequest::new(None, "Basic Reading (Phonics)", None);
        assert!(matches!(
            ActivitySelector::resolve(&request),
            Err(WorksheetError::MissingInput("activity focus"))
        ));
    }

    #[test]
    fn subtype_must_belong_to_focus() {
        let request = ActivityRequest::new(Some(ActivityFocus::SelfHelp), "Shapes (Math)", None);
        assert!(matches!(
            ActivitySelector::resolve(&request),
            Err(WorksheetError::UnknownSubtype { .. })
        ));
    }

    #[test]
    fn list_wrapped_focus_resolves_like_scalar() {
        let scalar = ActivityRequest::from_session_focus(
            &SessionValue::text("Cognitive"),
            "Basic Reading (Phonics)",
            None,
        )
        .unwrap();
        let listed = ActivityRequest::from_session_focus(
            &SessionValue::list(["Cognitive"]),
            "Basic Reading (Phonics)",
            None,
        )
        .unwrap();

        assert_eq!(scalar, listed);
        assert_eq!(
            ActivitySelector::resolve(&listed).unwrap(),
            ActivitySelector::resolve(&scalar).unwrap()
        );
    }

    #[test]
    fn menu_lists_both_focus_areas() {
        let menu = ActivitySelector::menu();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].0, ActivityFocus::Cognitive);
        assert_eq!(menu[0].1[0], "Basic Reading (Phonics)");
        assert_eq!(menu[1].1.last(), Some(&"Other/Custom Skill"));
        assert_eq!(
            ActivitySelector::tracing_labels(),
            vec!["Line Tracing", "Alphabet Tracing", "Writing Practice"]
        );
    }
}
