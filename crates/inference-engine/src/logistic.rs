//! Fitted Logistic Regression

use crate::classifier::Classifier;
use crate::InferenceError;
use feature_engine::FeatureVector;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Logistic regression parameters as stored in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Class names, in `predict_proba` order
    pub classes: Vec<String>,
    /// One row for a binary model, one row per class otherwise
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    /// Column names the model was fitted on, if recorded
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Linear classifier with a logistic (binary) or softmax (multinomial) link
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<String>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl LogisticRegression {
    /// Build from stored parameters, checking their shapes
    pub fn from_params(params: &LogisticParams) -> Result<Self, InferenceError> {
        let n_classes = params.classes.len();
        if n_classes < 2 {
            return Err(InferenceError::InvalidModel(format!(
                "need at least two classes, got {}",
                n_classes
            )));
        }

        let rows = params.coef.len();
        let binary = n_classes == 2 && rows == 1;
        if !binary && rows != n_classes {
            return Err(InferenceError::InvalidModel(format!(
                "{} classes need 1 or {} coefficient rows, got {}",
                n_classes, n_classes, rows
            )));
        }
        if params.intercept.len() != rows {
            return Err(InferenceError::InvalidModel(format!(
                "expected {} intercepts, got {}",
                rows,
                params.intercept.len()
            )));
        }

        let cols = params.coef[0].len();
        if cols == 0 || params.coef.iter().any(|row| row.len() != cols) {
            return Err(InferenceError::InvalidModel(
                "coefficient rows must be non-empty and of equal width".into(),
            ));
        }

        let flat: Vec<f64> = params.coef.iter().flatten().copied().collect();
        if flat.iter().chain(&params.intercept).any(|v| !v.is_finite()) {
            return Err(InferenceError::InvalidModel("non-finite coefficient".into()));
        }

        let coef = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| InferenceError::InvalidModel(e.to_string()))?;

        debug!("Logistic regression: {} classes, {} features", n_classes, cols);
        Ok(Self {
            classes: params.classes.clone(),
            coef,
            intercept: Array1::from_vec(params.intercept.clone()),
        })
    }

    /// Raw linear scores `coef · x + intercept`
    pub fn decision_function(&self, features: &FeatureVector) -> Result<Array1<f64>, InferenceError> {
        if features.len() != self.n_features() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        let x = ArrayView1::from(features.values());
        let scores = self.coef.dot(&x) + &self.intercept;
        if let Some(&bad) = scores.iter().find(|s| !s.is_finite()) {
            debug!("Rejecting non-finite decision score {}", bad);
            return Err(InferenceError::NonFiniteScore(bad));
        }
        Ok(scores)
    }
}

impl Classifier for LogisticRegression {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        let scores = self.decision_function(features)?;
        if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            Ok(vec![1.0 - p, p])
        } else {
            Ok(softmax(&scores.to_vec()))
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn binary() -> LogisticRegression {
        LogisticRegression::from_params(&LogisticParams {
            classes: vec!["No".into(), "Yes".into()],
            coef: vec![vec![2.0, -1.0]],
            intercept: vec![0.5],
            feature_names: None,
        })
        .unwrap()
    }

    #[test]
    fn test_binary_probability() {
        let clf = binary();
        let fv = FeatureVector::from_values(vec![1.0, 0.5]);
        // z = 2 - 0.5 + 0.5 = 2
        let proba = clf.predict_proba(&fv).unwrap();
        let expected = 1.0 / (1.0 + (-2.0f64).exp());
        assert!((proba[1] - expected).abs() < 1e-12);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert_eq!(clf.predict(&fv).unwrap(), "Yes");
    }

    #[test]
    fn test_negative_score_predicts_first_class() {
        let clf = binary();
        let fv = FeatureVector::from_values(vec![-1.0, 0.0]);
        assert_eq!(clf.predict(&fv).unwrap(), "No");
    }

    #[test]
    fn test_multinomial_softmax() {
        let clf = LogisticRegression::from_params(&LogisticParams {
            classes: vec!["a".into(), "b".into(), "c".into()],
            coef: vec![vec![1.0], vec![0.0], vec![-1.0]],
            intercept: vec![0.0, 0.0, 0.0],
            feature_names: None,
        })
        .unwrap();
        let proba = clf.predict_proba(&FeatureVector::from_values(vec![1.0])).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(proba[0] > proba[1] && proba[1] > proba[2]);
        assert_eq!(clf.predict(&FeatureVector::from_values(vec![1.0])).unwrap(), "a");
    }

    #[test]
    fn test_overflowing_score_is_error() {
        let clf = LogisticRegression::from_params(&LogisticParams {
            classes: vec!["No".into(), "Yes".into()],
            coef: vec![vec![1e308, -1e308]],
            intercept: vec![0.0],
            feature_names: None,
        })
        .unwrap();
        // 1e309 - 1e309 is NaN
        let fv = FeatureVector::from_values(vec![10.0, 10.0]);
        assert!(matches!(
            clf.predict_proba(&fv),
            Err(InferenceError::NonFiniteScore(s)) if s.is_nan()
        ));
        assert!(clf.predict(&fv).is_err());
    }

    #[test]
    fn test_wrong_width_rejected() {
        let clf = binary();
        let err = clf.predict_proba(&FeatureVector::from_values(vec![1.0])).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::InvalidInputShape { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_invalid_params() {
        let mut params = LogisticParams {
            classes: vec!["No".into(), "Yes".into()],
            coef: vec![vec![1.0, 2.0], vec![1.0]],
            intercept: vec![0.0, 0.0],
            feature_names: None,
        };
        assert!(LogisticRegression::from_params(&params).is_err());

        params.coef = vec![vec![1.0]];
        assert!(LogisticRegression::from_params(&params).is_err());

        params.intercept = vec![f64::NAN];
        assert!(LogisticRegression::from_params(&params).is_err());

        params.intercept = vec![0.0];
        params.classes.truncate(1);
        assert!(LogisticRegression::from_params(&params).is_err());
    }

    proptest! {
        #[test]
        fn prop_sigmoid_is_bounded(z in -800.0f64..800.0) {
            let p = sigmoid(z);
            prop_assert!((0.0..=1.0).contains(&p));
            prop_assert!(!p.is_nan());
        }
    }
}
