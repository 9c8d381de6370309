//! Input validation utilities.
//!
//! This module contains the checks applied to user input before it is stored in a profile or
//! embedded in a prompt.

use crate::constants::{MAX_CHILD_AGE, MIN_CHILD_AGE};
use crate::{WorksheetError, WorksheetResult};
use chrono::NaiveDate;

/// A worksheet topic that is guaranteed to be non-empty.
///
/// The input is trimmed of leading and trailing whitespace during construction. Every
/// [`ActivityType`](crate::ActivityType) carries its label through this type, so an empty or
/// whitespace-only topic can never reach the prompt builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Creates a new `Topic` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`WorksheetError::MissingInput`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> WorksheetResult<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WorksheetError::MissingInput("activity topic"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validates that an age is within the supported range.
///
/// # Errors
///
/// Returns [`WorksheetError::AgeOutOfRange`] if `age` is outside `1..=18`.
pub fn validate_child_age(age: i64) -> WorksheetResult<u8> {
    if age < i64::from(MIN_CHILD_AGE) || age > i64::from(MAX_CHILD_AGE) {
        return Err(WorksheetError::AgeOutOfRange(age));
    }
    // Range checked above.
    Ok(age as u8)
}

/// Parses a profile date in ISO `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns [`WorksheetError::InvalidInput`] if the value is not a valid calendar date.
pub fn parse_profile_date(field: &str, value: &str) -> WorksheetResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        WorksheetError::InvalidInput(format!("{field} must be a YYYY-MM-DD date: {e}"))
    })
}
