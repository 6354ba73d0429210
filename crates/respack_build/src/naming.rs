//! Destination file naming.

use std::path::Path;

use crate::object::BuildObject;

/// Assigns `dest_file` for every object under `output_dir`.
///
/// Objects keep their name as file name, or, when `obfuscate` is set, get
/// their position in `objects` (`0`, `1`, `2`, ...).
pub fn assign_output_names(objects: &mut [BuildObject], output_dir: &Path, obfuscate: bool) {
    for (seq, object) in objects.iter_mut().enumerate() {
        object.dest_file = if obfuscate {
            output_dir.join(seq.to_string())
        } else {
            output_dir.join(&object.name)
        };
    }
}
