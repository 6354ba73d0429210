//! Error types for resource conversion.

use std::path::PathBuf;

/// Errors a converter can report for a single resource.
///
/// Conversion errors are never fatal to a build: the pipeline marks the
/// resource as failed and carries on with the others.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// An I/O error occurred while reading the source or writing the output.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The source file is not valid JSON.
    #[error("invalid JSON in {path}: {reason}")]
    Json {
        /// The offending source file.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A parameter required by the converter is missing or has the wrong value.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An external tool could not be run or reported failure.
    #[error("{program} failed: {reason}")]
    Tool {
        /// The program that was invoked.
        program: String,
        /// Exit status or launch error.
        reason: String,
    },
}

impl ConvertError {
    /// Creates an [`InvalidParameter`](Self::InvalidParameter) error.
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
