//! Verbatim byte copy for resources that need no conversion.

use crate::converter::{ConvertArgs, Converter};
use crate::error::ConvertError;

/// Copies the source file unchanged (scripts, strings, opaque blobs).
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyConverter;

impl Converter for CopyConverter {
    fn convert(&self, args: &ConvertArgs<'_>) -> Result<(), ConvertError> {
        std::fs::copy(args.source_file, args.output_file)
            .map(|_| ())
            .map_err(|e| ConvertError::Io {
                path: args.source_file.to_path_buf(),
                source: e,
            })
    }
}
