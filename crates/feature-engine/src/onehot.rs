//! One-Hot Indicator Encoding

use crate::error::{EncodeError, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with a label the encoder never saw at fit time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Encode as the all-zero block
    #[default]
    Ignore,
    /// Reject the record
    Error,
}

/// Fitted one-hot encoder parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Known labels per categorical column, in fit order
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    /// Total number of indicator columns
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub(crate) fn check(&self, columns: &[String]) -> Result<(), SchemaError> {
        if self.categories.len() != columns.len() {
            return Err(SchemaError::LengthMismatch {
                component: "encoder",
                expected: columns.len(),
                actual: self.categories.len(),
            });
        }
        for (column, block) in columns.iter().zip(&self.categories) {
            if block.is_empty() {
                return Err(SchemaError::InvalidCategories {
                    column: column.clone(),
                    reason: "no categories".to_string(),
                });
            }
            let mut seen = std::collections::HashSet::with_capacity(block.len());
            if let Some(dup) = block.iter().find(|c| !seen.insert(c.as_str())) {
                return Err(SchemaError::InvalidCategories {
                    column: column.clone(),
                    reason: format!("duplicate category {:?}", dup),
                });
            }
        }
        Ok(())
    }

    /// Label to indicator position, one map per column
    pub(crate) fn lookup_tables(&self) -> Vec<HashMap<String, usize>> {
        self.categories
            .iter()
            .map(|block| {
                block
                    .iter()
                    .enumerate()
                    .map(|(i, label)| (label.clone(), i))
                    .collect()
            })
            .collect()
    }

    /// Indicator names `{column}_{category}`, in vector order
    pub fn feature_names(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .zip(&self.categories)
            .flat_map(|(column, block)| block.iter().map(move |c| format!("{}_{}", column, c)))
            .collect()
    }

    /// Append the indicator block for `label` to `out`
    pub(crate) fn encode_into(
        &self,
        idx: usize,
        column: &str,
        label: &str,
        lookup: &HashMap<String, usize>,
        out: &mut Vec<f64>,
    ) -> Result<(), EncodeError> {
        let start = out.len();
        out.resize(start + self.categories[idx].len(), 0.0);

        match lookup.get(label) {
            Some(&pos) => out[start + pos] = 1.0,
            None if self.handle_unknown == HandleUnknown::Error => {
                out.truncate(start);
                return Err(EncodeError::UnknownCategory {
                    column: column.to_string(),
                    value: label.to_string(),
                });
            }
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder(handle_unknown: HandleUnknown) -> OneHotEncoder {
        OneHotEncoder {
            categories: vec![
                vec!["No".into(), "Yes".into()],
                vec!["E".into(), "N".into(), "S".into(), "W".into()],
            ],
            handle_unknown,
        }
    }

    fn cols() -> Vec<String> {
        vec!["RainToday".into(), "WindDir".into()]
    }

    #[test]
    fn test_known_label_sets_one_indicator() {
        let enc = encoder(HandleUnknown::Ignore);
        let tables = enc.lookup_tables();
        let mut out = Vec::new();
        enc.encode_into(1, "WindDir", "S", &tables[1], &mut out).unwrap();
        assert_eq!(out, vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unknown_label_ignored() {
        let enc = encoder(HandleUnknown::Ignore);
        let tables = enc.lookup_tables();
        let mut out = vec![0.5];
        enc.encode_into(1, "WindDir", "Unknown", &tables[1], &mut out).unwrap();
        assert_eq!(out, vec![0.5, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unknown_label_rejected_when_configured() {
        let enc = encoder(HandleUnknown::Error);
        let tables = enc.lookup_tables();
        let mut out = vec![0.5];
        let err = enc
            .encode_into(0, "RainToday", "Maybe", &tables[0], &mut out)
            .unwrap_err();
        assert_eq!(err.field(), "RainToday");
        assert_eq!(out, vec![0.5]);
    }

    #[test]
    fn test_feature_names_and_width() {
        let enc = encoder(HandleUnknown::Ignore);
        assert_eq!(enc.width(), 6);
        assert_eq!(
            enc.feature_names(&cols()),
            vec!["RainToday_No", "RainToday_Yes", "WindDir_E", "WindDir_N", "WindDir_S", "WindDir_W"]
        );
    }

    #[test]
    fn test_check_rejects_duplicates_and_empty_blocks() {
        let mut enc = encoder(HandleUnknown::Ignore);
        enc.categories[1].push("N".into());
        assert!(matches!(
            enc.check(&cols()),
            Err(SchemaError::InvalidCategories { .. })
        ));

        enc.categories[1].clear();
        assert!(enc.check(&cols()).is_err());
    }

    #[test]
    fn test_handle_unknown_defaults_to_ignore() {
        let enc: OneHotEncoder = serde_json::from_str(r#"{"categories": [["a"]]}"#).unwrap();
        assert_eq!(enc.handle_unknown, HandleUnknown::Ignore);
    }
}
