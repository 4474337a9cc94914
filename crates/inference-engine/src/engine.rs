//! Forecast Engine

use crate::bundle::ModelBundle;
use crate::classifier::probability_of;
use crate::InferenceError;
use data_validator::RawRecord;
use feature_engine::{EncodeError, FeatureEncoder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Forecast label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RainLabel {
    /// Rain tomorrow
    Yes,
    /// No rain tomorrow
    No,
}

impl RainLabel {
    /// Class name used by the classifier
    pub fn as_str(&self) -> &'static str {
        match self {
            RainLabel::Yes => "Yes",
            RainLabel::No => "No",
        }
    }

    /// Parse a classifier class name
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "Yes" => Some(RainLabel::Yes),
            "No" => Some(RainLabel::No),
            _ => None,
        }
    }

    /// Text shown with the result
    pub fn headline(&self) -> &'static str {
        match self {
            RainLabel::Yes => "It will rain tomorrow",
            RainLabel::No => "No rain tomorrow",
        }
    }
}

/// Forecast for one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub label: RainLabel,
    /// Probability of `label`
    pub probability: f64,
    /// Probability per class name
    pub probabilities: BTreeMap<String, f64>,
    /// Encode plus classify time in microseconds
    pub latency_us: u64,
}

impl Forecast {
    pub fn headline(&self) -> &'static str {
        self.label.headline()
    }
}

/// Errors for a single forecast request
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The submitted record is unusable
    #[error(transparent)]
    Input(#[from] EncodeError),
    /// The model failed; not the user's fault
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ForecastError {
    /// Whether the user can fix this by changing the input
    pub fn is_input_error(&self) -> bool {
        matches!(self, ForecastError::Input(_))
    }
}

/// Encodes records and classifies them with a shared bundle
#[derive(Debug, Clone)]
pub struct Forecaster {
    bundle: Arc<ModelBundle>,
}

impl Forecaster {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Encode, classify and look up the predicted label's probability by name
    pub fn forecast(&self, record: &RawRecord) -> Result<Forecast, ForecastError> {
        let start = Instant::now();
        let features = FeatureEncoder::new(self.bundle.schema()).encode(record)?;

        let classifier = self.bundle.classifier();
        let predicted = classifier.predict(&features)?;
        let proba = classifier.predict_proba(&features)?;

        let label = RainLabel::from_class(&predicted).ok_or(InferenceError::UnknownClass(predicted))?;
        let probability = probability_of(classifier.classes(), &proba, label.as_str())?;
        let probabilities = classifier
            .classes()
            .iter()
            .cloned()
            .zip(proba.iter().copied())
            .collect();

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            "Forecast: {} (p={:.3}, latency={}us)",
            label.as_str(),
            probability,
            latency_us
        );

        Ok(Forecast {
            label,
            probability,
            probabilities,
            latency_us,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::tests::{small_document, DEMO_MODEL};
    use crate::classifier::tests::FixedClassifier;
    use data_validator::{FieldValue, ValidationError};

    fn forecaster() -> Forecaster {
        Forecaster::new(Arc::new(ModelBundle::from_document(small_document()).unwrap()))
    }

    fn record() -> RawRecord {
        RawRecord::new()
            .with("Humidity3pm", 92.0)
            .with("Pressure3pm", 1004.0)
            .with("WindDir", "N")
    }

    #[test]
    fn test_humid_low_pressure_day_rains() {
        let forecast = forecaster().forecast(&record()).unwrap();
        assert_eq!(forecast.label, RainLabel::Yes);
        assert!(forecast.probability > 0.5 && forecast.probability <= 1.0);
        assert_eq!(forecast.probability, forecast.probabilities["Yes"]);
        assert_eq!(forecast.headline(), "It will rain tomorrow");
    }

    #[test]
    fn test_dry_day_reports_no_rain_probability() {
        let dry = RawRecord::new()
            .with("Humidity3pm", 20.0)
            .with("Pressure3pm", 1025.0)
            .with("WindDir", "S");
        let forecast = forecaster().forecast(&dry).unwrap();
        assert_eq!(forecast.label, RainLabel::No);
        assert_eq!(forecast.probability, forecast.probabilities["No"]);
        assert!((forecast.probabilities.values().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_probability_follows_class_name_not_position() {
        let base = ModelBundle::from_document(small_document()).unwrap();
        let schema = base.schema().clone();
        let classifier = FixedClassifier {
            classes: vec!["Yes".into(), "No".into()],
            proba: vec![0.9, 0.1],
            width: 5,
        };
        let bundle = ModelBundle::new(schema, Box::new(classifier), None).unwrap();
        let forecast = Forecaster::new(Arc::new(bundle)).forecast(&record()).unwrap();

        assert_eq!(forecast.label, RainLabel::Yes);
        assert_eq!(forecast.probability, 0.9);
        assert_eq!(forecast.probabilities["No"], 0.1);
    }

    #[test]
    fn test_missing_numeric_is_input_error_and_bundle_survives() {
        let forecaster = forecaster();
        let mut incomplete = record();
        incomplete.remove("Pressure3pm");

        let err = forecaster.forecast(&incomplete).unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(
            err,
            ForecastError::Input(EncodeError::Invalid(ValidationError::MissingField(ref f))) if f == "Pressure3pm"
        ));

        assert!(forecaster.forecast(&record()).is_ok());
    }

    #[test]
    fn test_scaling_overflow_is_input_error() {
        let mut doc = small_document();
        doc.scaler = feature_engine::Scaler::Standard {
            mean: vec![0.0, 0.0],
            scale: vec![0.5, 0.5],
        };
        let forecaster = Forecaster::new(Arc::new(ModelBundle::from_document(doc).unwrap()));
        let extreme = record().with("Humidity3pm", 1e308).with("Pressure3pm", -1e308);

        let err = forecaster.forecast(&extreme).unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(
            err,
            ForecastError::Input(EncodeError::Invalid(ValidationError::NonFinite { ref field, .. })) if field == "Humidity3pm"
        ));
    }

    #[test]
    fn test_latency_is_recorded_in_microseconds() {
        let forecast = forecaster().forecast(&record()).unwrap();
        // A single logistic forecast finishes well under a second
        assert!(forecast.latency_us < 1_000_000);
    }

    #[test]
    fn test_demo_model_end_to_end() {
        let bundle = Arc::new(ModelBundle::load(DEMO_MODEL).unwrap());
        let schema = bundle.schema();

        let record = RawRecord::new()
            .with("Location", "Sydney")
            .with("MinTemp", 13.4)
            .with("MaxTemp", 22.9)
            .with("Rainfall", 0.6)
            .with("WindGustDir", "Unknown")
            .with("WindGustSpeed", 44.0)
            .with("Humidity9am", 71.0)
            .with("Humidity3pm", 22.0)
            .with("Pressure9am", 1007.7)
            .with("Pressure3pm", 1007.1)
            .with("Temp9am", 16.9)
            .with("Temp3pm", 21.8)
            .with("RainToday", FieldValue::Missing);

        let features = feature_engine::encode(&record, schema).unwrap();
        let range = schema.indicator_range("WindGustDir").unwrap();
        assert!(features.segment(range).iter().all(|&v| v == 0.0));

        let forecast = Forecaster::new(bundle).forecast(&record).unwrap();
        assert!((0.0..=1.0).contains(&forecast.probability));
        assert!(matches!(forecast.label, RainLabel::Yes | RainLabel::No));
    }
}
