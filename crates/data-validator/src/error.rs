//! Validation Error Types

use thiserror::Error;

/// Errors in a user-submitted record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required attribute absent from the record
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Numeric attribute that does not parse as a number
    #[error("{field}: cannot parse {value:?} as a number")]
    InvalidNumber { field: String, value: String },

    /// Numeric attribute that parsed to an infinite value
    #[error("{field}: value {value} is not finite")]
    NonFinite { field: String, value: f64 },
}

impl ValidationError {
    /// Name of the offending attribute
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidNumber { field, .. } => field,
            ValidationError::NonFinite { field, .. } => field,
        }
    }
}
