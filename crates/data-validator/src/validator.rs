//! Record Validator for Presence and Numeric Checks

use crate::error::ValidationError;
use crate::record::{FieldValue, RawRecord};
use tracing::debug;

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the record is usable
    pub valid: bool,
    /// Every problem found, in required-field order
    pub errors: Vec<ValidationError>,
    /// Number of fields checked
    pub fields_checked: usize,
    /// Parsed numeric attributes in validator order; `None` is left to imputation
    pub numeric: Vec<Option<f64>>,
}

impl ValidationResult {
    /// Create a valid result carrying the parsed numerics
    pub fn valid(fields_checked: usize, numeric: Vec<Option<f64>>) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
            numeric,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
            numeric: Vec::new(),
        }
    }

    /// Parsed numerics, or the first error
    pub fn into_result(self) -> Result<Vec<Option<f64>>, ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.numeric),
        }
    }
}

/// Validator for form records against a fixed set of required attributes
#[derive(Debug, Clone)]
pub struct Validator {
    required: Vec<String>,
    numeric: Vec<String>,
}

impl Validator {
    /// Create a validator. `numeric` names the attributes that must parse as numbers.
    pub fn new(required: Vec<String>, numeric: Vec<String>) -> Self {
        Self { required, numeric }
    }

    /// Check that every required attribute is present and every numeric
    /// attribute parses. All problems are collected; on success the parsed
    /// numerics come back in the order given to [`Validator::new`].
    pub fn validate(&self, record: &RawRecord) -> ValidationResult {
        let mut errors = Vec::new();
        let mut numeric = Vec::with_capacity(self.numeric.len());

        for name in &self.required {
            if !record.contains(name) {
                errors.push(ValidationError::MissingField(name.clone()));
            }
        }

        for name in &self.numeric {
            if let Some(value) = record.get(name) {
                match Self::parse_numeric(name, value) {
                    Ok(parsed) => numeric.push(parsed),
                    Err(e) => errors.push(e),
                }
            } else if !self.required.contains(name) {
                errors.push(ValidationError::MissingField(name.clone()));
            }
        }

        let fields_checked = self.required.len();
        if errors.is_empty() {
            ValidationResult::valid(fields_checked, numeric)
        } else {
            debug!("Record rejected with {} error(s)", errors.len());
            ValidationResult::invalid(errors, fields_checked)
        }
    }

    /// Parse a numeric attribute. `Ok(None)` means missing (null, NaN or
    /// blank) and is left to imputation.
    pub fn parse_numeric(field: &str, value: &FieldValue) -> Result<Option<f64>, ValidationError> {
        let parsed = match value {
            FieldValue::Missing => return Ok(None),
            FieldValue::Number(v) => *v,
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed.parse::<f64>().map_err(|_| ValidationError::InvalidNumber {
                    field: field.to_string(),
                    value: s.clone(),
                })?
            }
        };

        if parsed.is_nan() {
            Ok(None)
        } else if parsed.is_infinite() {
            Err(ValidationError::NonFinite {
                field: field.to_string(),
                value: parsed,
            })
        } else {
            Ok(Some(parsed))
        }
    }
}
