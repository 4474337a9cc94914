//! Raw Record Types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single value entered on the form
///
/// Deserializes from a JSON number, string or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric input
    Number(f64),
    /// Text input or a selected label
    Text(String),
    /// Explicitly empty
    Missing,
}

impl FieldValue {
    /// True when the value carries no information: null, NaN or blank text
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Missing => true,
            FieldValue::Number(v) => v.is_nan(),
            FieldValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Number)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Attribute name to value mapping for one prediction request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an attribute, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Remove an attribute
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Look up an attribute
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Whether the attribute is present (possibly with an empty value)
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Attribute names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_values() {
        let record: RawRecord = serde_json::from_str(
            r#"{"MinTemp": 13.4, "Location": "Sydney", "Sunshine": null, "Cloud9am": ""}"#,
        )
        .unwrap();

        assert_eq!(record.len(), 4);
        assert_eq!(record.get("MinTemp"), Some(&FieldValue::Number(13.4)));
        assert_eq!(record.get("Location"), Some(&FieldValue::Text("Sydney".into())));
        assert_eq!(record.get("Sunshine"), Some(&FieldValue::Missing));
        assert!(record.get("Cloud9am").unwrap().is_blank());
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::Missing.is_blank());
        assert!(FieldValue::Number(f64::NAN).is_blank());
        assert!(FieldValue::from("   ").is_blank());
        assert!(!FieldValue::from("No").is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_builder_and_iterator_agree() {
        let built = RawRecord::new().with("MaxTemp", 22.9).with("RainToday", "No");
        let collected: RawRecord = vec![
            ("MaxTemp", FieldValue::from(22.9)),
            ("RainToday", FieldValue::from("No")),
        ]
        .into_iter()
        .collect();

        assert_eq!(built, collected);
        assert_eq!(built.names().collect::<Vec<_>>(), vec!["MaxTemp", "RainToday"]);
    }
}
