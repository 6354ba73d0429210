//! Resource converters for the asset pipeline.
//!
//! A converter turns one source file into one engine-ready artifact. The
//! pipeline owns scheduling and caching; converters only read their source
//! and write their output. This crate defines the [`Converter`] interface
//! and the built-in converters that need no external libraries.

#![warn(missing_docs)]

pub mod converter;
pub mod copy;
pub mod error;
pub mod json;
pub mod shaderc;

pub use converter::{ConvertArgs, Converter};
pub use copy::CopyConverter;
pub use error::ConvertError;
pub use json::JsonConverter;
pub use shaderc::{ShadercConverter, STANDARD_INCLUDE_DIR};
