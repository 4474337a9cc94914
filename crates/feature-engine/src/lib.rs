//! Feature Engineering Engine
//!
//! Holds the fitted schema of the rain classifier and turns raw form records
//! into the exact feature vector the classifier was fitted on.

mod error;
mod features;
mod imputer;
mod onehot;
mod scaler;
mod schema;

pub use error::{EncodeError, SchemaError};
pub use features::{encode, FeatureEncoder, FeatureVector};
pub use imputer::{ImputeStrategy, SimpleImputer};
pub use onehot::{HandleUnknown, OneHotEncoder};
pub use scaler::Scaler;
pub use schema::{FieldDescriptor, FieldKind, Schema, SchemaParts, FORM_COLUMNS, NUMERIC_FIELD_DEFAULT};
