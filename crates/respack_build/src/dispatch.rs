//! Conversion dispatch and delivery into the output directory.

use std::path::Path;

use respack_convert::ConvertArgs;

use crate::error::ObjectError;
use crate::object::BuildObject;
use crate::registry::Registry;

/// Runs the registered converter for `object`, writing to `artifact`.
///
/// The artifact counts as produced only if it exists and is non-empty after
/// the converter returns. On any failure whatever the converter left at
/// `artifact` is removed, so a failed slot never holds a partial file.
pub fn convert_object(
    object: &BuildObject,
    artifact: &Path,
    registry: &Registry,
    modify_filename: bool,
) -> Result<(), ObjectError> {
    std::fs::metadata(&object.source_file).map_err(|e| ObjectError::Source {
        path: object.source_file.clone(),
        source: e,
    })?;

    let converter = registry
        .converter(&object.object_type)
        .ok_or_else(|| ObjectError::UnknownType(object.object_type.clone()))?;

    let args = ConvertArgs {
        source_file: &object.source_file,
        output_file: artifact,
        params: &object.params,
        modify_filename,
    };
    log::debug!("converting {} [{}]", object.name, object.object_type);

    let result = converter
        .convert(&args)
        .map_err(ObjectError::from)
        .and_then(|()| match std::fs::metadata(artifact) {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(ObjectError::EmptyArtifact {
                path: artifact.to_path_buf(),
            }),
        });

    if result.is_err() && artifact.exists() {
        if let Err(e) = std::fs::remove_file(artifact) {
            log::warn!("cannot remove failed artifact {}: {e}", artifact.display());
        }
    }
    result
}

/// Copies `artifact` to the object's destination and returns its size.
pub fn deliver(object: &BuildObject, artifact: &Path) -> Result<u64, ObjectError> {
    std::fs::copy(artifact, &object.dest_file).map_err(|e| ObjectError::Copy {
        from: artifact.to_path_buf(),
        to: object.dest_file.clone(),
        source: e,
    })
}
