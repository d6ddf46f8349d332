//! Validation error types

use std::fmt;

/// Schema violation found while checking request input.
///
/// Display output follows the `"field" <problem>` phrasing clients of the
/// product API already match on.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field is absent
    Required { field: &'static str },

    /// String field is present but empty
    Empty { field: &'static str },

    /// Field has the wrong JSON type (or an unparseable value)
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// Field is not part of the schema
    NotAllowed { field: String },

    /// Body is valid JSON but not an object
    NotAnObject,

    /// Body could not be read as JSON at all
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "\"{}\" is required", field),
            Self::Empty { field } => write!(f, "\"{}\" is not allowed to be empty", field),
            Self::WrongType { field, expected } => {
                write!(f, "\"{}\" must be a {}", field, expected)
            }
            Self::NotAllowed { field } => write!(f, "\"{}\" is not allowed", field),
            Self::NotAnObject => write!(f, "\"value\" must be of type object"),
            Self::Malformed { reason } => write!(f, "invalid JSON body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
