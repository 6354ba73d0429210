//! Runtime access to a built package.
//!
//! Opens the `data.package` manifest written by the build and maps every
//! packaged resource by name, so an engine can locate and read resources
//! without knowing whether the package was obfuscated.

#![warn(missing_docs)]

pub mod error;
pub mod package;

pub use error::PackageError;
pub use package::{Package, Resource, PACKAGE_FILE};
