//! Request and response bodies for the REST API.
//!
//! Profile values travel as plain JSON: `null`, an integer, a string, or a list of strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error body returned with every non-2xx response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// `missing_input`, `invalid_input`, `not_found` or `generation_failed`.
    pub kind: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionRes {
    pub session_id: String,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileRes {
    pub session_id: String,
    pub complete: bool,
    /// Keys of required fields that are still empty.
    pub missing: Vec<String>,
    #[schema(value_type = Object)]
    pub fields: BTreeMap<String, Value>,
    pub updated_at: String,
}

/// Partial profile update. Every key must name a profile field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileReq {
    #[schema(value_type = Object)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContextRes {
    pub session_id: String,
    pub context: String,
}

/// An activity selection as made on the form.
///
/// `focus` may be a string or a one-element list, matching how the form stores it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityReq {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub focus: Option<Value>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub tracing_focus: Option<String>,
    #[serde(default)]
    pub custom_topic: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResolveActivityRes {
    pub activity_type: String,
    pub custom: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PromptRes {
    pub activity_type: String,
    pub worksheet_prompt: String,
    pub image_prompt: String,
    pub text_prompt: String,
    pub profile_complete: bool,
    pub missing: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextActivityRes {
    pub activity_type: String,
    pub text: String,
    pub profile_complete: bool,
    pub missing: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FocusOptions {
    pub focus: String,
    pub subtypes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityOptionsRes {
    pub focuses: Vec<FocusOptions>,
    pub tracing: Vec<String>,
    pub known_activities: Vec<String>,
    /// Allowed values for each choice and tag field, keyed by field.
    pub profile_options: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn activity_req_fields_are_optional() {
        let req: ActivityReq = serde_json::from_value(json!({ "custom_topic": "Dinosaurs" })).unwrap();
        assert_eq!(req.custom_topic.as_deref(), Some("Dinosaurs"));
        assert!(req.focus.is_none());
        assert!(req.subtype.is_none());
    }

    #[test]
    fn activity_req_accepts_list_focus() {
        let req: ActivityReq =
            serde_json::from_value(json!({ "focus": ["Cognitive"], "subtype": "Shapes" })).unwrap();
        assert_eq!(req.focus, Some(json!(["Cognitive"])));
    }
}
