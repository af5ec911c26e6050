//! Null value handling for data loading

use serde::{Serialize, Deserialize};

/// Cell values read as missing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: ["", "-", "NA", "N/A", "NaN", "null", "None"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            trim_whitespace: true,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as null (case-insensitive)
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace { value.trim() } else { value };
        self.patterns.iter().any(|pattern| test_value.eq_ignore_ascii_case(pattern))
    }

    /// The value with null patterns mapped to `None`
    pub fn normalize<'v>(&self, value: &'v str) -> Option<&'v str> {
        if self.is_null(value) {
            None
        } else if self.trim_whitespace {
            Some(value.trim())
        } else {
            Some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(config.is_null("  n/a "));
        assert!(config.is_null("nan"));
        assert!(!config.is_null("Asia"));
        assert_eq!(config.normalize(" Eagle "), Some("Eagle"));
        assert_eq!(config.normalize("NULL"), None);
    }
}
