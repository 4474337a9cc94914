//! Classifier Contract

use crate::InferenceError;
use feature_engine::FeatureVector;

/// A pre-fitted classifier over encoded feature vectors
pub trait Classifier: Send + Sync {
    /// Class names in the order `predict_proba` reports them
    fn classes(&self) -> &[String];

    /// Input width the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Probability per class, aligned with `classes()`
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError>;

    /// Most probable class; ties go to the earlier class
    fn predict(&self, features: &FeatureVector) -> Result<String, InferenceError> {
        let proba = self.predict_proba(features)?;
        let mut best = 0;
        for (i, &p) in proba.iter().enumerate().skip(1) {
            if p > proba[best] {
                best = i;
            }
        }
        self.classes()
            .get(best)
            .cloned()
            .ok_or_else(|| InferenceError::InvalidModel("classifier reports no classes".into()))
    }
}

/// Probability of class `name`, looked up by name in the classifier's own ordering
pub fn probability_of(classes: &[String], proba: &[f64], name: &str) -> Result<f64, InferenceError> {
    classes
        .iter()
        .position(|c| c == name)
        .and_then(|idx| proba.get(idx).copied())
        .ok_or_else(|| InferenceError::UnknownClass(name.to_string()))
}
