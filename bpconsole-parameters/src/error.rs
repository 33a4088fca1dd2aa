//! Error types for parameter definitions
//!
//! Field validation never produces these: a bad field value is reported as a
//! message in [`FormErrors`](crate::FormErrors). These errors describe broken
//! definition lists or unreadable input documents.

use thiserror::Error;

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, ParameterError>;

/// Errors that can occur while loading or checking parameter definitions
#[derive(Debug, Error)]
pub enum ParameterError {
    /// Two definitions in one list share a name
    #[error("duplicate parameter name: {name}")]
    DuplicateName { name: String },

    /// A definition has an empty name
    #[error("parameter definition at index {index} has an empty name")]
    EmptyName { index: usize },

    /// A definition uses a key the form reserves for resource metadata
    #[error("parameter name '{name}' is reserved")]
    ReservedName { name: String },

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_display() {
        let err = ParameterError::DuplicateName {
            name: "file_path".into(),
        };
        assert_eq!(err.to_string(), "duplicate parameter name: file_path");
    }

    #[test]
    fn test_empty_name_display() {
        let err = ParameterError::EmptyName { index: 3 };
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_reserved_name_display() {
        let err = ParameterError::ReservedName {
            name: "displayName".into(),
        };
        assert_eq!(err.to_string(), "parameter name 'displayName' is reserved");
    }

    #[test]
    fn test_yaml_error_converts() {
        let yaml_err = serde_yaml_ng::from_str::<Vec<String>>("[unclosed").unwrap_err();
        let err: ParameterError = yaml_err.into();
        assert!(err.to_string().starts_with("YAML error:"));
    }
}
