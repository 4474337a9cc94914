//! Feature Vector Assembly

use crate::error::EncodeError;
use crate::schema::Schema;
use data_validator::{RawRecord, ValidationError};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// Encoded input for the classifier: scaled numerics then indicator blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Wrap already-encoded values
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Slice of the vector, e.g. one indicator block
    pub fn segment(&self, range: Range<usize>) -> &[f64] {
        &self.values[range]
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Turns raw form records into feature vectors for one schema
pub struct FeatureEncoder<'a> {
    schema: &'a Schema,
}

impl<'a> FeatureEncoder<'a> {
    /// Create an encoder bound to a schema
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Encode one record.
    ///
    /// Blank categorical labels become the sentinel, missing numerics take
    /// the imputer's statistic, numerics are scaled in fit order, and labels
    /// become indicator blocks in categorical column order. A numeric that
    /// overflows during scaling is an input error.
    pub fn encode(&self, record: &RawRecord) -> Result<FeatureVector, EncodeError> {
        let schema = self.schema;
        let parsed = schema.validator().validate(record).into_result()?;

        for name in record.names() {
            if !schema.input_cols().iter().any(|c| c == name) {
                debug!("Ignoring attribute {} not in input columns", name);
            }
        }

        // Missing categoricals are normalized before anything else runs
        let labels: Vec<String> = schema
            .categorical_cols()
            .iter()
            .map(|name| match record.get(name) {
                Some(value) => schema.normalizer().normalize(value),
                None => schema.normalizer().sentinel().to_string(),
            })
            .collect();

        let mut values = Vec::with_capacity(schema.feature_width());

        // The validator parses numerics in numeric column order
        for (idx, (name, raw)) in schema.numeric_cols().iter().zip(parsed).enumerate() {
            let imputed = schema.imputer().fill(idx, raw);
            let scaled = schema.scaler().transform(idx, imputed);
            if !scaled.is_finite() {
                return Err(ValidationError::NonFinite {
                    field: name.clone(),
                    value: scaled,
                }
                .into());
            }
            values.push(scaled);
        }

        for (idx, (name, label)) in schema.categorical_cols().iter().zip(&labels).enumerate() {
            schema
                .encoder()
                .encode_into(idx, name, label, schema.lookup(idx), &mut values)?;
        }

        debug_assert_eq!(values.len(), schema.feature_width());
        Ok(FeatureVector { values })
    }
}

/// Encode `record` against `schema`
pub fn encode(record: &RawRecord, schema: &Schema) -> Result<FeatureVector, EncodeError> {
    FeatureEncoder::new(schema).encode(record)
}
