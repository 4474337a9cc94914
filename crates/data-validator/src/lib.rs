//! Data Validation and Normalization
//!
//! Provides the raw record submitted by the forecast form, presence and
//! numeric-parse checks, and normalization of blank categorical labels.

mod error;
mod normalizer;
mod record;
mod validator;

pub use error::ValidationError;
pub use normalizer::{CategoryNormalizer, UNKNOWN_CATEGORY};
pub use record::{FieldValue, RawRecord};
pub use validator::{ValidationResult, Validator};
