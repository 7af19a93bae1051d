//! Null value handling for data loading

use serde::{Serialize, Deserialize};

/// Cell values that mark a missing field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: ["", "-", "N/A", "NA", "null", "None", "nan"]
                .into_iter()
                .map(String::from)
                .collect(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as null
    pub fn is_null(&self, value: &str) -> bool {
        let value = if self.trim_whitespace { value.trim() } else { value };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                value == pattern
            } else {
                value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// The value, or `None` if it matches a null pattern
    pub fn value<'a>(&self, value: &'a str) -> Option<&'a str> {
        if self.is_null(value) {
            None
        } else if self.trim_whitespace {
            Some(value.trim())
        } else {
            Some(value)
        }
    }

    /// Add a null pattern
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
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
        assert!(config.is_null("NULL"));
        assert!(!config.is_null("0"));
        assert_eq!(config.value(" 2022 "), Some("2022"));
        assert_eq!(config.value("none"), None);
    }

    #[test]
    fn test_case_sensitive() {
        let mut config = NullConfig {
            case_sensitive: true,
            ..NullConfig::default()
        };
        config.add_pattern("missing");
        config.add_pattern("missing");
        assert_eq!(config.patterns.iter().filter(|p| *p == "missing").count(), 1);
        assert!(config.is_null("missing"));
        assert!(!config.is_null("MISSING"));
    }
}
