//! Child profile storage.
//!
//! [`ProfileStore`] owns the child profile for one session. It wraps a raw [`SessionStore`],
//! guarantees every profile field has a value, normalises values at the point they are written,
//! and produces a typed [`ChildProfile`] snapshot for prompt construction.
//!
//! Values are normalised once, on the way in. Readers of a `ProfileStore` or a
//! `ChildProfile` never need to handle list-versus-scalar ambiguity themselves.

pub mod fields;
pub mod options;

use crate::session::{SessionStore, SessionValue};
use crate::{WorksheetError, WorksheetResult};
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub use fields::{FieldKind, ProfileField};
pub use options::{
    AcademicLevel, ActivityFocus, CommunicationLevel, CommunicationMethod, Gender,
    LearningStyle, ProfileOption, SensitivityLevel,
};

/// Fields that must be filled in before a profile counts as complete.
pub const REQUIRED_FIELDS: &[ProfileField] = &[ProfileField::ChildName, ProfileField::ChildAge];

/// The child profile held in one session's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileStore {
    session: SessionStore,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    /// Creates a profile with every field at its default.
    pub fn new() -> Self {
        let mut store = Self {
            session: SessionStore::new(),
        };
        store.ensure_defaults();
        store
    }

    /// Adopts existing session state.
    ///
    /// Values under known profile keys are normalised; keys that are not profile fields are left
    /// untouched, since the session may also hold unrelated widget state. Missing profile fields
    /// are then filled with defaults.
    ///
    /// # Errors
    ///
    /// Returns the first normalisation error encountered for a known field.
    pub fn from_session(session: SessionStore) -> WorksheetResult<Self> {
        let mut normalised = SessionStore::new();
        for (key, value) in session.iter() {
            match ProfileField::from_key(key) {
                Some(field) => {
                    if field == ProfileField::ActivityFocus
                        && matches!(value, SessionValue::List(items) if items.len() == 1)
                    {
                        tracing::warn!(key = %key, "one-element focus list stored as scalar");
                    }
                    normalised.set(field.key(), field.normalise(value.clone())?)
                }
                None => normalised.set(key, value.clone()),
            }
        }

        let mut store = Self {
            session: normalised,
        };
        store.ensure_defaults();
        Ok(store)
    }

    /// Establishes defaults for any profile field that has no value yet.
    ///
    /// Existing values are never overwritten, so this is safe to call on every interaction.
    /// Returns the number of fields that were defaulted.
    pub fn ensure_defaults(&mut self) -> usize {
        let inserted = self.session.insert_missing(
            ProfileField::ALL
                .iter()
                .map(|field| (field.key(), field.default_value())),
        );
        if inserted > 0 {
            tracing::debug!(inserted, "established profile defaults");
        }
        inserted
    }

    /// Returns the stored value for `field`, or its default if none is stored.
    pub fn get(&self, field: ProfileField) -> SessionValue {
        self.session
            .get(field.key())
            .cloned()
            .unwrap_or_else(|| field.default_value())
    }

    /// Normalises and stores a single field value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be normalised for the field; the stored value is left
    /// unchanged in that case.
    pub fn set(&mut self, field: ProfileField, value: SessionValue) -> WorksheetResult<()> {
        let value = field.normalise(value)?;
        self.session.set(field.key(), value);
        Ok(())
    }

    /// Applies a batch of `key -> value` updates.
    ///
    /// All values are validated before any is written, so a rejected batch leaves the profile
    /// as it was. Returns the number of fields written.
    ///
    /// # Errors
    ///
    /// - [`WorksheetError::UnknownField`] if a key is not a profile field.
    /// - Any normalisation error from [`ProfileField::normalise`].
    pub fn update<I, K>(&mut self, values: I) -> WorksheetResult<usize>
    where
        I: IntoIterator<Item = (K, SessionValue)>,
        K: AsRef<str>,
    {
        let mut staged = Vec::new();
        for (key, value) in values {
            let key = key.as_ref();
            let field = ProfileField::from_key(key)
                .ok_or_else(|| WorksheetError::UnknownField(key.to_owned()))?;
            staged.push((field, field.normalise(value)?));
        }

        let written = staged.len();
        for (field, value) in staged {
            self.session.set(field.key(), value);
        }
        Ok(written)
    }

    /// True iff `child_name` is non-empty and `child_age` is set.
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Required fields that are still empty, in display order.
    pub fn missing_required(&self) -> Vec<ProfileField> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| match self.get(*field) {
                SessionValue::Null => true,
                SessionValue::Text(s) => s.is_empty(),
                SessionValue::Integer(_) => false,
                SessionValue::List(items) => items.is_empty(),
            })
            .collect()
    }

    /// Every profile field with its current value, in catalogue order.
    pub fn fields(&self) -> impl Iterator<Item = (ProfileField, SessionValue)> + '_ {
        ProfileField::ALL
            .iter()
            .map(move |field| (*field, self.get(*field)))
    }

    /// The underlying session state.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Typed snapshot of the current profile.
    pub fn profile(&self) -> ChildProfile {
        ChildProfile {
            name: self.text(ProfileField::ChildName),
            age: match self.get(ProfileField::ChildAge) {
                SessionValue::Integer(n) => u8::try_from(n).ok(),
                _ => None,
            },
            birthday: self.date(ProfileField::ChildBirthday),
            gender: self.choice(ProfileField::ChildGender),
            parent_name: self.text(ProfileField::ParentName),
            parent_contact: self.text(ProfileField::ParentContact),

            diagnosis: self.text(ProfileField::Diagnosis),
            diagnosis_date: self.date(ProfileField::DiagnosisDate),
            diagnosed_by: self.text(ProfileField::DiagnosedBy),
            current_therapies: self.tags(ProfileField::CurrentTherapies),

            communication_method: self.choice(ProfileField::CommunicationMethod),
            expressive_level: self.text(ProfileField::ExpressiveLevel),
            receptive_level: self.text(ProfileField::ReceptiveLevel),
            communication_challenges: self.tags(ProfileField::CommunicationChallenges),
            communication_level: self.choice(ProfileField::CommLevel),
            communication_methods: self.text(ProfileField::CommMethods),

            sensory_sensitivities: self.tags(ProfileField::SensorySensitivities),
            sensory_needs: self.tags(ProfileField::SensoryNeeds),
            calming_strategies: self.tags(ProfileField::CalmingStrategies),
            sensitivity_level: self.choice(ProfileField::SensoryProfile),
            sensory_triggers: self.text(ProfileField::SensoryTriggers),

            strengths: self.text(ProfileField::ChildStrengths),
            interests: self.text(ProfileField::ChildInterests),

            behavior_triggers: self.text(ProfileField::BehaviorTriggers),
            behavior_management: self.text(ProfileField::BehaviorManagement),
            behavioral_notes: self.text(ProfileField::BehavioralNotes),

            learning_style: self.choice(ProfileField::LearningStyle),
            academic_focus: self.text(ProfileField::AcademicFocus),
            academic_level: self.choice(ProfileField::AcademicLevel),

            routine_morning: self.text(ProfileField::RoutineMorning),
            routine_school: self.text(ProfileField::RoutineSchool),
            routine_bedtime: self.text(ProfileField::RoutineBedtime),
            eating_notes: self.text(ProfileField::EatingNotes),

            allergies: self.text(ProfileField::Allergies),
            emergency_contact: self.text(ProfileField::EmergencyContact),
            safety_concerns: self.text(ProfileField::SafetyConcerns),

            activity_focus: self.choice(ProfileField::ActivityFocus),
        }
    }

    fn text(&self, field: ProfileField) -> String {
        match self.get(field) {
            SessionValue::Text(s) => s,
            SessionValue::Integer(n) => n.to_string(),
            SessionValue::Null | SessionValue::List(_) => String::new(),
        }
    }

    fn tags(&self, field: ProfileField) -> BTreeSet<String> {
        match self.get(field) {
            SessionValue::List(items) => items.into_iter().collect(),
            _ => BTreeSet::new(),
        }
    }

    fn date(&self, field: ProfileField) -> Option<NaiveDate> {
        self.get(field)
            .as_text()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    fn choice<T: ProfileOption>(&self, field: ProfileField) -> Option<T> {
        self.get(field).as_text().and_then(T::from_label)
    }
}

/// Typed, read-only view of a child profile.
///
/// Built from a [`ProfileStore`] with [`ProfileStore::profile`]. Empty text fields are empty
/// strings; unset choices, dates and age are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildProfile {
    pub name: String,
    pub age: Option<u8>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub parent_name: String,
    pub parent_contact: String,

    pub diagnosis: String,
    pub diagnosis_date: Option<NaiveDate>,
    pub diagnosed_by: String,
    pub current_therapies: BTreeSet<String>,

    pub communication_method: Option<CommunicationMethod>,
    pub expressive_level: String,
    pub receptive_level: String,
    pub communication_challenges: BTreeSet<String>,
    pub communication_level: Option<CommunicationLevel>,
    pub communication_methods: String,

    pub sensory_sensitivities: BTreeSet<String>,
    pub sensory_needs: BTreeSet<String>,
    pub calming_strategies: BTreeSet<String>,
    pub sensitivity_level: Option<SensitivityLevel>,
    pub sensory_triggers: String,

    pub strengths: String,
    pub interests: String,

    pub behavior_triggers: String,
    pub behavior_management: String,
    pub behavioral_notes: String,

    pub learning_style: Option<LearningStyle>,
    pub academic_focus: String,
    pub academic_level: Option<AcademicLevel>,

    pub routine_morning: String,
    pub routine_school: String,
    pub routine_bedtime: String,
    pub eating_notes: String,

    pub allergies: String,
    pub emergency_contact: String,
    pub safety_concerns: String,

    pub activity_focus: Option<ActivityFocus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_defines_every_field() {
        let store = ProfileStore::new();
        for field in ProfileField::ALL {
            assert!(
                store.session().contains(field.key()),
                "{field} should have a default"
            );
        }
    }

    #[test]
    fn ensure_defaults_is_idempotent() {
        let mut store = ProfileStore::new();
        store
            .set(ProfileField::ChildName, SessionValue::text("Mia"))
            .unwrap();
        store
            .set(ProfileField::LearningStyle, SessionValue::text("Auditory"))
            .unwrap();
        let before = store.clone();

        assert_eq!(store.ensure_defaults(), 0);
        assert_eq!(store, before);
        assert_eq!(store.get(ProfileField::ChildName), SessionValue::text("Mia"));
        assert_eq!(
            store.get(ProfileField::LearningStyle),
            SessionValue::text("Auditory")
        );
    }

    #[test]
    fn complete_requires_name_and_age() {
        let mut store = ProfileStore::new();
        assert!(!store.is_complete());
        assert_eq!(
            store.missing_required(),
            vec![ProfileField::ChildName, ProfileField::ChildAge]
        );

        store
            .set(ProfileField::ChildName, SessionValue::text("Leo"))
            .unwrap();
        assert!(!store.is_complete());
        assert_eq!(store.missing_required(), vec![ProfileField::ChildAge]);

        store
            .set(ProfileField::ChildAge, SessionValue::Integer(6))
            .unwrap();
        assert!(store.is_complete());

        store.set(ProfileField::ChildAge, SessionValue::Null).unwrap();
        assert!(!store.is_complete());
    }

    #[test]
    fn other_fields_do_not_affect_completeness() {
        let mut store = ProfileStore::new();
        store
            .update([
                ("child_name", SessionValue::text("Leo")),
                ("child_age", SessionValue::Integer(9)),
                ("learning_style", SessionValue::text("")),
                ("allergies", SessionValue::text("")),
            ])
            .unwrap();
        assert!(store.is_complete());
    }

    #[test]
    fn rejected_update_leaves_profile_unchanged() {
        let mut store = ProfileStore::new();
        store
            .set(ProfileField::ChildName, SessionValue::text("Leo"))
            .unwrap();
        let before = store.clone();

        let err = store
            .update([
                ("child_name", SessionValue::text("Changed")),
                ("child_age", SessionValue::Integer(40)),
            ])
            .unwrap_err();

        assert!(matches!(err, WorksheetError::AgeOutOfRange(40)));
        assert_eq!(store, before);
    }

    #[test]
    fn update_rejects_unknown_keys() {
        let mut store = ProfileStore::new();
        let err = store
            .update([("favourite_colour", SessionValue::text("blue"))])
            .unwrap_err();
        assert!(matches!(err, WorksheetError::UnknownField(key) if key == "favourite_colour"));
    }

    #[test]
    fn from_session_normalises_focus_list_once() {
        let mut session = SessionStore::new();
        session.set("child_activity", SessionValue::list(["Self-Help"]));
        session.set("tracing_focus", SessionValue::text("Line Tracing"));

        let store = ProfileStore::from_session(session).unwrap();

        assert_eq!(
            store.get(ProfileField::ActivityFocus),
            SessionValue::text("Self-Help")
        );
        assert_eq!(
            store.session().get("tracing_focus"),
            Some(&SessionValue::text("Line Tracing"))
        );
        assert_eq!(store.profile().activity_focus, Some(ActivityFocus::SelfHelp));
    }

    #[test]
    fn snapshot_carries_typed_values() {
        let mut store = ProfileStore::new();
        store
            .update([
                ("child_name", SessionValue::text("Mia")),
                ("child_age", SessionValue::text("7")),
                ("child_birthday", SessionValue::text("2018-05-04")),
                ("sensory_profile", SessionValue::text("High")),
                (
                    "calming_strategies",
                    SessionValue::list(["Visual timer", "Deep pressure"]),
                ),
            ])
            .unwrap();

        let profile = store.profile();
        assert_eq!(profile.name, "Mia");
        assert_eq!(profile.age, Some(7));
        assert_eq!(profile.birthday, NaiveDate::from_ymd_opt(2018, 5, 4));
        assert_eq!(profile.sensitivity_level, Some(SensitivityLevel::High));
        assert_eq!(profile.learning_style, Some(LearningStyle::Visual));
        assert_eq!(
            profile.calming_strategies.iter().collect::<Vec<_>>(),
            vec!["Deep pressure", "Visual timer"]
        );
        assert_eq!(profile.activity_focus, Some(ActivityFocus::Cognitive));
    }

    #[test]
    fn cleared_choice_snapshots_as_none() {
        let mut store = ProfileStore::new();
        store
            .set(ProfileField::ActivityFocus, SessionValue::text(""))
            .unwrap();
        assert_eq!(store.profile().activity_focus, None);
    }
}
