//! Rain Forecast Inference
//!
//! Loads the fitted model bundle once, runs the classifier over encoded
//! feature vectors and interprets its output as a rain forecast.

mod bundle;
mod classifier;
mod engine;
mod logistic;

pub use bundle::{ArtifactFormat, BundleDocument, ModelBundle, ModelParams};
pub use classifier::{probability_of, Classifier};
pub use engine::{Forecast, ForecastError, Forecaster, RainLabel};
pub use logistic::{LogisticParams, LogisticRegression};

use feature_engine::SchemaError;
use thiserror::Error;

/// Errors loading or running the classifier
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Unsupported model artifact: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("Invalid model parameters: {0}")]
    InvalidModel(String),
    #[error("Model does not match the feature encoder: {0}")]
    ModelMismatch(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Class {0:?} is not reported by the classifier")]
    UnknownClass(String),
    #[error("Decision score overflowed: {0}")]
    NonFiniteScore(f64),
}
