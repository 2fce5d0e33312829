//! Error handling module for the ulpt CLI.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling throughout the application. A fixture that produces the
//! wrong exit code is not an error in this taxonomy; it is recorded in the
//! suite totals and printed, never raised.

use thiserror::Error;

/// Main error type for the ulpt CLI application.
///
/// This enum represents all possible errors that can occur
/// during the execution of ulpt commands.
#[derive(Error, Debug)]
pub enum UlptError {
    /// Error when a required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when input validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using UlptError.
///
/// This type alias simplifies function signatures by providing
/// a consistent result type throughout the application.
pub type Result<T> = std::result::Result<T, UlptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = UlptError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_validation_error_display() {
        let err = UlptError::Validation("not a directory".to_string());
        assert_eq!(err.to_string(), "Validation error: not a directory");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ulpt_err: UlptError = io_err.into();
        assert!(matches!(ulpt_err, UlptError::Io(_)));
    }
}
