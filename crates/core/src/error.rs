use crate::generation::GenerationError;

#[derive(Debug, thiserror::Error)]
pub enum WorksheetError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("missing required input: {0}")]
    MissingInput(&'static str),
    #[error("child_age must be between 1 and 18, got {0}")]
    AgeOutOfRange(i64),
    #[error("unknown profile field: {0}")]
    UnknownField(String),
    #[error("{value:?} is not a valid option for {field}")]
    UnknownOption { field: &'static str, value: String },
    #[error("{field} expects {expected}")]
    FieldShape {
        field: &'static str,
        expected: &'static str,
    },
    #[error("unknown activity focus: {0:?}")]
    UnknownFocus(String),
    #[error("unknown {focus} activity subtype: {subtype:?}")]
    UnknownSubtype { focus: String, subtype: String },

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl WorksheetError {
    /// Whether the caller should block the action and show a warning rather than an error.
    ///
    /// Everything except a failed external call counts as missing or invalid user input.
    pub fn is_user_input(&self) -> bool {
        !matches!(self, WorksheetError::Generation(_))
    }
}

pub type WorksheetResult<T> = std::result::Result<T, WorksheetError>;
