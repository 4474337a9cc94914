//! Fitted Feature Schema
//!
//! The schema is built once from the model artifact and never mutated. It owns
//! the column lists, the fitted transform parameters, the per-column label
//! lookup tables and the form field descriptors.

use crate::error::SchemaError;
use crate::imputer::SimpleImputer;
use crate::onehot::OneHotEncoder;
use crate::scaler::Scaler;
use data_validator::{CategoryNormalizer, Validator};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;
use tracing::{debug, info};

/// Default shown in numeric form fields
pub const NUMERIC_FIELD_DEFAULT: f64 = 0.0;

/// Number of columns in the form layout
pub const FORM_COLUMNS: usize = 2;

/// Unvalidated schema components as stored in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaParts {
    pub input_cols: Vec<String>,
    pub numeric_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
    /// Form options per categorical column; absent means free text
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
    pub imputer: SimpleImputer,
    pub scaler: Scaler,
    pub encoder: OneHotEncoder,
}

/// How a form field is rendered and collected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Numeric { default: f64 },
    Categorical { options: Vec<String> },
    FreeText,
}

/// One form field, in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Layout column, alternating left and right
    pub column: usize,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Validated, immutable feature schema
#[derive(Debug, Clone)]
pub struct Schema {
    parts: SchemaParts,
    fields: Vec<FieldDescriptor>,
    lookup: Vec<HashMap<String, usize>>,
    validator: Validator,
    normalizer: CategoryNormalizer,
}

impl Schema {
    /// Validate the parts and resolve field descriptors
    pub fn new(parts: SchemaParts) -> Result<Self, SchemaError> {
        if parts.numeric_cols.is_empty() && parts.categorical_cols.is_empty() {
            return Err(SchemaError::NoFeatures);
        }

        let inputs = unique_set(&parts.input_cols)?;
        let mut features = HashSet::new();
        for column in parts.numeric_cols.iter().chain(&parts.categorical_cols) {
            if !inputs.contains(column.as_str()) {
                return Err(SchemaError::NotAnInput(column.clone()));
            }
            if !features.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }

        parts.imputer.check(&parts.numeric_cols)?;
        parts.scaler.check(&parts.numeric_cols)?;
        parts.encoder.check(&parts.categorical_cols)?;

        let fields = resolve_fields(&parts);
        let lookup = parts.encoder.lookup_tables();
        let validator = Validator::new(parts.input_cols.clone(), parts.numeric_cols.clone());

        let schema = Self {
            parts,
            fields,
            lookup,
            validator,
            normalizer: CategoryNormalizer::default(),
        };

        info!(
            "Schema loaded: {} inputs, {} numeric, {} categorical, feature width {}",
            schema.parts.input_cols.len(),
            schema.parts.numeric_cols.len(),
            schema.parts.categorical_cols.len(),
            schema.feature_width()
        );
        Ok(schema)
    }

    pub fn input_cols(&self) -> &[String] {
        &self.parts.input_cols
    }

    pub fn numeric_cols(&self) -> &[String] {
        &self.parts.numeric_cols
    }

    pub fn categorical_cols(&self) -> &[String] {
        &self.parts.categorical_cols
    }

    pub fn categories(&self) -> &BTreeMap<String, Vec<String>> {
        &self.parts.categories
    }

    pub fn imputer(&self) -> &SimpleImputer {
        &self.parts.imputer
    }

    pub fn scaler(&self) -> &Scaler {
        &self.parts.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.parts.encoder
    }

    /// Form field descriptors in display order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Width of every encoded feature vector
    pub fn feature_width(&self) -> usize {
        self.parts.numeric_cols.len() + self.parts.encoder.width()
    }

    /// Names of the encoded columns, in vector order
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.parts.numeric_cols.clone();
        names.extend(self.parts.encoder.feature_names(&self.parts.categorical_cols));
        names
    }

    /// Position of a categorical column's indicator block in the vector
    pub fn indicator_range(&self, column: &str) -> Option<Range<usize>> {
        let mut start = self.parts.numeric_cols.len();
        for (name, block) in self.parts.categorical_cols.iter().zip(&self.parts.encoder.categories) {
            if name == column {
                return Some(start..start + block.len());
            }
            start += block.len();
        }
        None
    }

    pub(crate) fn lookup(&self, idx: usize) -> &HashMap<String, usize> {
        &self.lookup[idx]
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }

    pub(crate) fn normalizer(&self) -> &CategoryNormalizer {
        &self.normalizer
    }
}

fn unique_set(columns: &[String]) -> Result<HashSet<&str>, SchemaError> {
    let mut set = HashSet::with_capacity(columns.len());
    for column in columns {
        if !set.insert(column.as_str()) {
            return Err(SchemaError::DuplicateColumn(column.clone()));
        }
    }
    Ok(set)
}

fn resolve_fields(parts: &SchemaParts) -> Vec<FieldDescriptor> {
    parts
        .input_cols
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let kind = if parts.numeric_cols.contains(name) {
                FieldKind::Numeric {
                    default: NUMERIC_FIELD_DEFAULT,
                }
            } else {
                match parts.categories.get(name) {
                    Some(options) if !options.is_empty() => {
                        let mut options = options.clone();
                        options.sort();
                        options.dedup();
                        FieldKind::Categorical { options }
                    }
                    _ => FieldKind::FreeText,
                }
            };
            debug!("Field {} resolved as {:?}", name, kind);
            FieldDescriptor {
                name: name.clone(),
                column: i % FORM_COLUMNS,
                kind,
            }
        })
        .collect()
}
