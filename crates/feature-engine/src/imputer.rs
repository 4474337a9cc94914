//! Fitted Missing-Value Imputation

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};

/// Strategy the imputer was fitted with. Only informational: the fitted
/// statistics already encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    Mean,
    Median,
    MostFrequent,
    Constant,
}

/// Per-column substitutes for missing numeric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleImputer {
    pub strategy: ImputeStrategy,
    /// One substitute per numeric column, in fit order
    pub statistics: Vec<f64>,
}

impl SimpleImputer {
    pub(crate) fn check(&self, columns: &[String]) -> Result<(), SchemaError> {
        if self.statistics.len() != columns.len() {
            return Err(SchemaError::LengthMismatch {
                component: "imputer",
                expected: columns.len(),
                actual: self.statistics.len(),
            });
        }
        for (column, stat) in columns.iter().zip(&self.statistics) {
            if !stat.is_finite() {
                return Err(SchemaError::InvalidParameter {
                    component: "imputer",
                    column: column.clone(),
                    reason: format!("statistic {} is not finite", stat),
                });
            }
        }
        Ok(())
    }

    /// Value for column `idx`, substituting the fitted statistic when missing
    pub fn fill(&self, idx: usize, value: Option<f64>) -> f64 {
        value.unwrap_or(self.statistics[idx])
    }
}
