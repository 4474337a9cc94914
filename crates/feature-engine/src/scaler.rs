//! Fitted Numeric Scaling

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};

/// Per-column affine transform fitted on the training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Number of columns the scaler was fitted on
    pub fn len(&self) -> usize {
        match self {
            Scaler::Standard { scale, .. } | Scaler::MinMax { scale, .. } => scale.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn check(&self, columns: &[String]) -> Result<(), SchemaError> {
        let (offset, scale, standard) = match self {
            Scaler::Standard { mean, scale } => (mean, scale, true),
            Scaler::MinMax { min, scale } => (min, scale, false),
        };

        for params in [offset, scale] {
            if params.len() != columns.len() {
                return Err(SchemaError::LengthMismatch {
                    component: "scaler",
                    expected: columns.len(),
                    actual: params.len(),
                });
            }
        }

        for ((column, &o), &s) in columns.iter().zip(offset).zip(scale) {
            let reason = if !o.is_finite() || !s.is_finite() {
                Some(format!("offset {} / scale {} not finite", o, s))
            } else if standard && s == 0.0 {
                Some("zero scale".to_string())
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(SchemaError::InvalidParameter {
                    component: "scaler",
                    column: column.clone(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Scale column `idx`
    pub fn transform(&self, idx: usize, value: f64) -> f64 {
        match self {
            Scaler::Standard { mean, scale } => (value - mean[idx]) / scale[idx],
            Scaler::MinMax { min, scale } => value * scale[idx] + min[idx],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{}", i)).collect()
    }

    #[test]
    fn test_standard_transform() {
        let scaler = Scaler::Standard {
            mean: vec![10.0, 1000.0],
            scale: vec![2.0, 5.0],
        };
        assert!(scaler.check(&cols(2)).is_ok());
        assert!((scaler.transform(0, 14.0) - 2.0).abs() < 1e-12);
        assert!((scaler.transform(1, 995.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_transform() {
        // Fitted on range [-5, 45]: scale = 1/50, min = 5/50
        let scaler = Scaler::MinMax {
            min: vec![0.1],
            scale: vec![0.02],
        };
        assert!((scaler.transform(0, -5.0)).abs() < 1e-12);
        assert!((scaler.transform(0, 45.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_rejects_zero_scale() {
        let scaler = Scaler::Standard {
            mean: vec![0.0],
            scale: vec![0.0],
        };
        assert!(matches!(
            scaler.check(&cols(1)),
            Err(SchemaError::InvalidParameter { component: "scaler", .. })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let scaler = Scaler::MinMax {
            min: vec![0.0, 0.0],
            scale: vec![1.0],
        };
        assert!(matches!(
            scaler.check(&cols(1)),
            Err(SchemaError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_json_layout() {
        let scaler: Scaler =
            serde_json::from_str(r#"{"standard": {"mean": [1.0], "scale": [2.0]}}"#).unwrap();
        assert_eq!(scaler.len(), 1);
    }
}
