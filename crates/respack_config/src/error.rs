//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur when loading or validating a `compile.config` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration {path}: {source}")]
    IoError {
        /// The configuration file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The JSON content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected value at line 1 column 1".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected value at line 1 column 1"
        );
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("output directory is empty".to_string());
        assert_eq!(
            format!("{err}"),
            "validation error: output directory is empty"
        );
    }

    #[test]
    fn display_io_error() {
        let err = ConfigError::IoError {
            path: PathBuf::from("game/compile.config"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let display = format!("{err}");
        assert!(display.starts_with("failed to read configuration"));
        assert!(display.contains("compile.config"));
    }
}
