use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SelectionError {
    #[error("Unknown selection field '{0}'")]
    InvalidField(String),

    #[error("Field '{0}' cannot be used in a selection")]
    NotSelectable(String),

    #[error("Field '{0}' is maintained by the table and cannot be assigned")]
    ReadOnlyField(&'static str),

    #[error("Field '{field}' expects {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}
