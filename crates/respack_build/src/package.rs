//! Package definition loading and `data.package` output.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::error::BuildError;
use crate::object::BuildObject;

/// File name of the package manifest written to the output directory.
pub const PACKAGE_FILE: &str = "data.package";

/// Reads the package definition file.
///
/// The document must be a JSON object; it is echoed into `data.package`.
pub fn load_package(path: &Path) -> Result<Map<String, Value>, BuildError> {
    if !path.is_file() {
        return Err(BuildError::PackageNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    match serde_json::from_str(&content) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(BuildError::InvalidPackage {
            path: path.to_path_buf(),
            reason: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(BuildError::InvalidPackage {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Returns the directory the package is built from.
pub fn package_dir(package_file: &Path) -> PathBuf {
    match package_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Builds the `data.package` document.
///
/// Starts from the user's package document and sets `resources` to every
/// packaged object, in object order, and `metrics.size` to their total size.
/// Failed objects are left out of both. Returns the document and the total.
pub fn build_package_document(
    package: &Map<String, Value>,
    objects: &[BuildObject],
) -> (Value, u64) {
    let mut total_size = 0u64;
    let resources: Vec<Value> = objects
        .iter()
        .filter(|object| object.is_packaged())
        .map(|object| {
            total_size += object.dest_size;
            let file = object
                .dest_file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            json!({
                "name": object.name,
                "type": object.object_type,
                "file": file,
                "size": object.dest_size,
            })
        })
        .collect();

    let mut document = package.clone();
    document.insert("resources".to_string(), Value::Array(resources));
    match document.get_mut("metrics") {
        Some(Value::Object(metrics)) => {
            metrics.insert("size".to_string(), Value::from(total_size));
        }
        _ => {
            let mut metrics = Map::new();
            metrics.insert("size".to_string(), Value::from(total_size));
            document.insert("metrics".to_string(), Value::Object(metrics));
        }
    }
    (Value::Object(document), total_size)
}

/// Writes `data.package` into `output_dir` and returns the total size.
pub fn write_package(
    package: &Map<String, Value>,
    objects: &[BuildObject],
    output_dir: &Path,
) -> Result<u64, BuildError> {
    let (document, total_size) = build_package_document(package, objects);
    let path = output_dir.join(PACKAGE_FILE);
    let content =
        serde_json::to_string_pretty(&document).map_err(|e| BuildError::io(&path, e.into()))?;
    std::fs::write(&path, content).map_err(|e| BuildError::io(&path, e))?;
    log::info!("wrote {}", path.display());
    Ok(total_size)
}
