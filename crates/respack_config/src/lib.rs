//! Parsing and validation of `compile.config` build configuration files.
//!
//! The configuration lives next to the package definition file. It is
//! optional: a missing file yields the defaults. Relative paths are resolved
//! against the package directory into a [`ResolvedConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_config, ResolvedConfig};
pub use types::*;
