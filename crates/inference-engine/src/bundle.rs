//! Model Bundle Loading
//!
//! A bundle is the fitted schema plus the fitted classifier, loaded once per
//! process from a JSON or postcard artifact. Loading checks that the encoder
//! and the classifier agree on width, column order and classes; any mismatch
//! is a configuration error.

use crate::classifier::Classifier;
use crate::logistic::{LogisticParams, LogisticRegression};
use crate::InferenceError;
use feature_engine::{OneHotEncoder, Scaler, Schema, SchemaParts, SimpleImputer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Classes the forecast understands
pub const EXPECTED_CLASSES: [&str; 2] = ["No", "Yes"];

static GLOBAL_BUNDLE: OnceLock<Arc<ModelBundle>> = OnceLock::new();

/// On-disk encoding of the artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Postcard,
}

impl ArtifactFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("bin") | Some("postcard") => Ok(ArtifactFormat::Postcard),
            other => Err(InferenceError::UnsupportedFormat(format!(
                "{} (extension {:?})",
                path.display(),
                other
            ))),
        }
    }
}

/// Fitted classifier parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelParams {
    LogisticRegression(LogisticParams),
}

/// Serialized artifact layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleDocument {
    pub input_cols: Vec<String>,
    pub numeric_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
    pub imputer: SimpleImputer,
    pub scaler: Scaler,
    pub encoder: OneHotEncoder,
    pub model: ModelParams,
}

impl BundleDocument {
    /// Encode as postcard bytes
    pub fn to_postcard(&self) -> Result<Vec<u8>, InferenceError> {
        postcard::to_allocvec(self).map_err(|e| InferenceError::ModelLoadError(e.to_string()))
    }
}

/// Fitted schema and classifier, immutable after load
pub struct ModelBundle {
    schema: Schema,
    classifier: Box<dyn Classifier>,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("schema", &self.schema)
            .field("classes", &self.classifier.classes())
            .field("n_features", &self.classifier.n_features())
            .finish()
    }
}

impl ModelBundle {
    /// Pair a schema with a classifier, checking that they agree.
    /// `feature_names` are the columns the classifier was fitted on, if known.
    pub fn new(
        schema: Schema,
        classifier: Box<dyn Classifier>,
        feature_names: Option<&[String]>,
    ) -> Result<Self, InferenceError> {
        let width = schema.feature_width();
        if classifier.n_features() != width {
            return Err(InferenceError::ModelMismatch(format!(
                "encoder produces {} features, classifier expects {}",
                width,
                classifier.n_features()
            )));
        }

        if let Some(fitted) = feature_names {
            let encoded = schema.feature_names();
            if fitted.len() != encoded.len() {
                return Err(InferenceError::ModelMismatch(format!(
                    "classifier was fitted on {} named columns, encoder produces {}",
                    fitted.len(),
                    encoded.len()
                )));
            }
            if let Some((i, (f, e))) = fitted.iter().zip(&encoded).enumerate().find(|(_, (f, e))| f != e) {
                return Err(InferenceError::ModelMismatch(format!(
                    "column {} is {:?} in the classifier but {:?} in the encoder",
                    i, f, e
                )));
            }
        } else {
            warn!("Classifier carries no feature names; column order is checked by width only");
        }

        let mut classes: Vec<&str> = classifier.classes().iter().map(String::as_str).collect();
        classes.sort_unstable();
        if classes != EXPECTED_CLASSES {
            return Err(InferenceError::ModelMismatch(format!(
                "classifier classes {:?}, expected {:?}",
                classifier.classes(),
                EXPECTED_CLASSES
            )));
        }

        Ok(Self { schema, classifier })
    }

    /// Build from a decoded artifact
    pub fn from_document(doc: BundleDocument) -> Result<Self, InferenceError> {
        let schema = Schema::new(SchemaParts {
            input_cols: doc.input_cols,
            numeric_cols: doc.numeric_cols,
            categorical_cols: doc.categorical_cols,
            categories: doc.categories,
            imputer: doc.imputer,
            scaler: doc.scaler,
            encoder: doc.encoder,
        })?;

        match doc.model {
            ModelParams::LogisticRegression(params) => {
                let classifier = LogisticRegression::from_params(&params)?;
                Self::new(schema, Box::new(classifier), params.feature_names.as_deref())
            }
        }
    }

    /// Decode an artifact from bytes
    pub fn from_bytes(bytes: &[u8], format: ArtifactFormat) -> Result<Self, InferenceError> {
        let doc: BundleDocument = match format {
            ArtifactFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| InferenceError::ModelLoadError(format!("invalid JSON artifact: {}", e)))?,
            ArtifactFormat::Postcard => postcard::from_bytes(bytes)
                .map_err(|e| InferenceError::ModelLoadError(format!("invalid postcard artifact: {}", e)))?,
        };
        Self::from_document(doc)
    }

    /// Read and decode an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let format = ArtifactFormat::from_path(path)?;
        info!("Loading model bundle from {} ({:?})", path.display(), format);

        let bytes = std::fs::read(path)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
        let bundle = Self::from_bytes(&bytes, format)?;

        info!(
            "Model bundle ready: {} features, classes {:?}",
            bundle.schema.feature_width(),
            bundle.classifier.classes()
        );
        Ok(bundle)
    }

    /// Process-wide bundle, loaded on first call. Later calls return the
    /// cached bundle whatever path they pass; a failed load is not cached.
    pub fn global(path: impl AsRef<Path>) -> Result<Arc<ModelBundle>, InferenceError> {
        if let Some(bundle) = GLOBAL_BUNDLE.get() {
            return Ok(Arc::clone(bundle));
        }
        let bundle = Arc::new(Self::load(path)?);
        Ok(Arc::clone(GLOBAL_BUNDLE.get_or_init(|| bundle)))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}
