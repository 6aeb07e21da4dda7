//! Error types for cadence.

use thiserror::Error;

/// Errors that can occur in cadence operations.
#[derive(Debug, Error)]
pub enum CadenceError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration problem (missing home dir, bad YAML, invalid value).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parsing of user input or serialized data failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CadenceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("JSON error: {e}"))
    }
}

impl From<serde_yaml::Error> for CadenceError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(format!("YAML error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CadenceError::NotFound("session 42".to_string());
        assert_eq!(err.to_string(), "Not found: session 42");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CadenceError = json_err.into();
        assert!(matches!(err, CadenceError::Parse(_)));
    }
}
