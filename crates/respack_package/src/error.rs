//! Error types for package access.

use std::path::PathBuf;

/// Errors that can occur while opening or reading a package.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// An I/O error occurred.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The package manifest is not a valid `data.package` document.
    #[error("invalid package manifest {}: {reason}", path.display())]
    Manifest {
        /// The manifest file.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// No resource with the requested name is in the package.
    #[error("no resource named \"{0}\"")]
    NotFound(String),
}
