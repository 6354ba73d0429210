//! The converter interface.

use std::path::Path;

use serde_json::Value;

use crate::error::ConvertError;

/// Everything a converter gets to see about one resource.
#[derive(Debug, Clone, Copy)]
pub struct ConvertArgs<'a> {
    /// The declared source file.
    pub source_file: &'a Path,
    /// Where the artifact must be written.
    pub output_file: &'a Path,
    /// The resource's parameters, exactly as declared.
    pub params: &'a Value,
    /// Whether the converter may embed readable file names in its output.
    ///
    /// False when the package is obfuscated.
    pub modify_filename: bool,
}

impl ConvertArgs<'_> {
    /// Returns the string parameter `name`, if present.
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

/// Converts one source file into one artifact.
///
/// Implementations must either write a complete artifact to
/// `args.output_file` or return an error. They are invoked concurrently for
/// distinct `(source_file, output_file)` pairs.
pub trait Converter: Send + Sync {
    /// Performs the conversion.
    fn convert(&self, args: &ConvertArgs<'_>) -> Result<(), ConvertError>;
}

impl<F> Converter for F
where
    F: Fn(&ConvertArgs<'_>) -> Result<(), ConvertError> + Send + Sync,
{
    fn convert(&self, args: &ConvertArgs<'_>) -> Result<(), ConvertError> {
        self(args)
    }
}

/// Writes `bytes` to `path`, mapping the error to [`ConvertError::Io`].
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    std::fs::write(path, bytes).map_err(|e| ConvertError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
