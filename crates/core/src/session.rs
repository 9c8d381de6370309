//! Per-session key-value state.
//!
//! A [`SessionStore`] is the raw store a form front end reads and writes: string keys mapped to
//! scalars or lists of strings. It knows nothing about profile semantics. [`ProfileStore`]
//! (crate::ProfileStore) layers field typing, defaults and normalisation on top of it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single value held in session state.
///
/// Values arrive from form inputs, JSON request bodies or YAML profile files, so the shape is
/// deliberately loose. Serialises as the bare JSON value (`null`, number, string or array).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionValue {
    Null,
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl SessionValue {
    pub fn text(value: impl Into<String>) -> Self {
        SessionValue::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SessionValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Unwraps a one-element list into its single scalar element.
    ///
    /// Front ends occasionally hand back a single-choice widget value as `["Cognitive"]`
    /// instead of `"Cognitive"`. Any other value is returned unchanged.
    pub fn into_scalar(self) -> Self {
        match self {
            SessionValue::List(mut items) if items.len() == 1 => {
                SessionValue::Text(items.remove(0))
            }
            other => other,
        }
    }

    /// Returns the text content if this value is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SessionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for `null`, blank strings and empty lists.
    pub fn is_blank(&self) -> bool {
        match self {
            SessionValue::Null => true,
            SessionValue::Integer(_) => false,
            SessionValue::Text(s) => s.trim().is_empty(),
            SessionValue::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        SessionValue::Text(value.to_owned())
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        SessionValue::Text(value)
    }
}

impl From<i64> for SessionValue {
    fn from(value: i64) -> Self {
        SessionValue::Integer(value)
    }
}

impl From<Vec<String>> for SessionValue {
    fn from(value: Vec<String>) -> Self {
        SessionValue::List(value)
    }
}

/// In-memory key-value store owned by a single session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStore {
    values: BTreeMap<String, SessionValue>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: SessionValue) {
        self.values.insert(key.into(), value);
    }

    /// Inserts every default whose key is not already present.
    ///
    /// Existing values are never overwritten, so calling this repeatedly is idempotent.
    /// Returns the number of keys that were inserted.
    pub fn insert_missing<I, K>(&mut self, defaults: I) -> usize
    where
        I: IntoIterator<Item = (K, SessionValue)>,
        K: Into<String>,
    {
        let mut inserted = 0;
        for (key, value) in defaults {
            let key = key.into();
            if !self.values.contains_key(&key) {
                self.values.insert(key, value);
                inserted += 1;
            }
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SessionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_missing_keeps_existing_values() {
        let mut store = SessionStore::new();
        store.set("child_name", SessionValue::text("Mia"));

        let inserted = store.insert_missing([
            ("child_name", SessionValue::text("")),
            ("child_interests", SessionValue::text("")),
        ]);

        assert_eq!(inserted, 1);
        assert_eq!(store.get("child_name"), Some(&SessionValue::text("Mia")));
        assert_eq!(store.get("child_interests"), Some(&SessionValue::text("")));

        let inserted_again = store.insert_missing([("child_interests", SessionValue::text("x"))]);
        assert_eq!(inserted_again, 0);
        assert_eq!(store.get("child_interests"), Some(&SessionValue::text("")));
    }

    #[test]
    fn singleton_list_unwraps_to_scalar() {
        assert_eq!(
            SessionValue::list(["Cognitive"]).into_scalar(),
            SessionValue::text("Cognitive")
        );
        assert_eq!(
            SessionValue::list(["a", "b"]).into_scalar(),
            SessionValue::list(["a", "b"])
        );
        assert_eq!(SessionValue::Null.into_scalar(), SessionValue::Null);
    }

    #[test]
    fn deserialises_loose_json_shapes() {
        let values: BTreeMap<String, SessionValue> = serde_json::from_str(
            r#"{"a": null, "b": 7, "c": "text", "d": ["x", "y"]}"#,
        )
        .expect("loose values should deserialise");

        assert_eq!(values["a"], SessionValue::Null);
        assert_eq!(values["b"], SessionValue::Integer(7));
        assert_eq!(values["c"], SessionValue::text("text"));
        assert_eq!(values["d"], SessionValue::list(["x", "y"]));
    }

    #[test]
    fn blank_detection() {
        assert!(SessionValue::Null.is_blank());
        assert!(SessionValue::text("   ").is_blank());
        assert!(SessionValue::List(vec![]).is_blank());
        assert!(!SessionValue::Integer(0).is_blank());
        assert!(!SessionValue::text("x").is_blank());
    }
}
