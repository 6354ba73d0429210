//! Generic JSON pass-through.

use serde_json::Value;

use crate::converter::{write_output, ConvertArgs, Converter};
use crate::error::ConvertError;

/// Validates a JSON source and writes it back in compact form.
///
/// Used for declarative resources (materials, models, shader programs,
/// texture descriptors) whose runtime form is the JSON document itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConverter;

impl Converter for JsonConverter {
    fn convert(&self, args: &ConvertArgs<'_>) -> Result<(), ConvertError> {
        let content = std::fs::read_to_string(args.source_file).map_err(|e| ConvertError::Io {
            path: args.source_file.to_path_buf(),
            source: e,
        })?;
        let document: Value = serde_json::from_str(&content).map_err(|e| ConvertError::Json {
            path: args.source_file.to_path_buf(),
            reason: e.to_string(),
        })?;
        let bytes = serde_json::to_vec(&document).map_err(|e| ConvertError::Json {
            path: args.output_file.to_path_buf(),
            reason: e.to_string(),
        })?;
        write_output(args.output_file, &bytes)
    }
}
