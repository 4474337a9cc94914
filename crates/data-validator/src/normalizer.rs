//! Categorical Label Normalization

use crate::record::FieldValue;

/// Sentinel label substituted for blank categorical input
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Turns a categorical field value into the label the encoder sees
#[derive(Debug, Clone)]
pub struct CategoryNormalizer {
    sentinel: String,
}

impl CategoryNormalizer {
    /// Create a normalizer with a custom sentinel label
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// Sentinel used for blank values
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Blank values become the sentinel; numbers become their textual form.
    /// Non-blank text is returned unchanged.
    pub fn normalize(&self, value: &FieldValue) -> String {
        if value.is_blank() {
            return self.sentinel.clone();
        }
        match value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(v) => v.to_string(),
            FieldValue::Missing => self.sentinel.clone(),
        }
    }
}

impl Default for CategoryNormalizer {
    fn default() -> Self {
        Self::new(UNKNOWN_CATEGORY)
    }
}
