//! Error types for the feature-flag-bundle library.
//!
//! Only configuration loading can fail. Flag evaluation always resolves to a
//! boolean, so nothing in this module is produced at request time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of configuration error that occurred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfigErrorKind {
    /// The document is not valid JSON or YAML
    ParseError,
    /// The configuration file could not be read
    IoError,
    /// The document structure was rejected by the configuration schema
    SchemaError,
    /// An allowed value coerced to an empty string
    EmptyValue,
    /// An allowed value is not a scalar
    InvalidValue,
}

/// Error raised while loading a bundle configuration.
///
/// These errors are fatal to application start-up and are never swallowed.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[error("{error_type:?} at '{path}': {message}")]
pub struct ConfigError {
    /// Human-readable error message
    pub message: String,
    /// JSON pointer of the offending node (empty for document-level errors)
    pub path: String,
    /// Type classification of the error
    pub error_type: ConfigErrorKind,
}

/// Result alias used by configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    fn new(error_type: ConfigErrorKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
            error_type,
        }
    }

    /// Creates a new parse error.
    ///
    /// # Example
    /// ```
    /// use feature_flag_bundle::error::{ConfigError, ConfigErrorKind};
    /// let err = ConfigError::parse_error("expected value at line 1 column 1");
    /// assert_eq!(err.error_type, ConfigErrorKind::ParseError);
    /// ```
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::ParseError, "", message)
    }

    /// Creates a new I/O error.
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::IoError, "", message)
    }

    /// Creates a new schema error for the node at `path`.
    pub fn schema_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::SchemaError, path, message)
    }

    /// Creates an error for an allowed value that is empty after coercion.
    pub fn empty_value(path: impl Into<String>) -> Self {
        Self::new(
            ConfigErrorKind::EmptyValue,
            path,
            "allowed values cannot be empty",
        )
    }

    /// Creates an error for an allowed value that cannot be coerced to a string.
    pub fn invalid_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::InvalidValue, path, message)
    }

    /// Converts the error to a JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error_type":{},"path":"{}","message":"{}"}}"#,
                serde_json::to_string(&self.error_type).unwrap_or_default(),
                self.path,
                self.message
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ConfigError::parse_error("test error");
        assert_eq!(err.error_type, ConfigErrorKind::ParseError);
        assert_eq!(err.message, "test error");
        assert!(err.path.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::empty_value("/providers/cookie/values/betaUI/0");
        let display = format!("{}", err);
        assert!(display.contains("EmptyValue"));
        assert!(display.contains("/providers/cookie/values/betaUI/0"));
        assert!(display.contains("cannot be empty"));
    }

    #[test]
    fn test_schema_error_keeps_path() {
        let err = ConfigError::schema_error("/providers/cookie", "additional properties not allowed");
        assert_eq!(err.error_type, ConfigErrorKind::SchemaError);
        assert_eq!(err.path, "/providers/cookie");
    }

    #[test]
    fn test_error_to_json() {
        let err = ConfigError::invalid_value("/providers/userAgent/values/x/0", "nested array");
        let json = err.to_json_string();
        assert!(json.contains("invalid_value"));
        assert!(json.contains("nested array"));
    }
}
