//! Schema and Encoding Error Types

use data_validator::ValidationError;
use thiserror::Error;

/// Malformed fitted schema. Always a configuration problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Schema has neither numeric nor categorical columns")]
    NoFeatures,

    #[error("Column {0} is not listed in input_cols")]
    NotAnInput(String),

    #[error("Column {0} is listed more than once")]
    DuplicateColumn(String),

    #[error("{component} expects {expected} columns, got {actual}")]
    LengthMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{component} parameter for {column} is invalid: {reason}")]
    InvalidParameter {
        component: &'static str,
        column: String,
        reason: String,
    },

    #[error("Encoder categories for {column} are invalid: {reason}")]
    InvalidCategories { column: String, reason: String },
}

/// Errors while encoding a single record. Always an input problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{column}: unknown category {value:?}")]
    UnknownCategory { column: String, value: String },
}

impl EncodeError {
    /// Name of the offending attribute
    pub fn field(&self) -> &str {
        match self {
            EncodeError::Invalid(e) => e.field(),
            EncodeError::UnknownCategory { column, .. } => column,
        }
    }
}
