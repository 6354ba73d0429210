//! Output directory preparation.

use std::path::Path;

use crate::error::BuildError;

/// What to do when the output directory already holds files.
#[derive(Debug, Clone, Copy, Default)]
pub enum OverwritePolicy {
    /// Abort the run.
    #[default]
    Deny,
    /// Clear the directory.
    Allow,
    /// Ask; the function returns `true` to clear the directory.
    Ask(fn(&Path) -> bool),
}

/// Ensures `dir` exists and is empty.
///
/// A non-empty directory is cleared when `force` is set or `policy` allows
/// it, and is otherwise a fatal [`BuildError::OutputExists`]. Only the
/// directory's contents are removed, never the directory itself.
pub fn prepare_output_dir(dir: &Path, force: bool, policy: OverwritePolicy) -> Result<(), BuildError> {
    if dir.is_dir() && !is_empty_dir(dir)? {
        let allowed = force
            || match policy {
                OverwritePolicy::Deny => false,
                OverwritePolicy::Allow => true,
                OverwritePolicy::Ask(confirm) => confirm(dir),
            };
        if !allowed {
            return Err(BuildError::OutputExists {
                path: dir.to_path_buf(),
            });
        }
        log::info!("clearing output directory {}", dir.display());
        clear_dir(dir)?;
    }

    std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))
}

fn is_empty_dir(dir: &Path) -> Result<bool, BuildError> {
    let mut entries = std::fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))?;
    Ok(entries.next().is_none())
}

fn clear_dir(dir: &Path) -> Result<(), BuildError> {
    for entry in std::fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))? {
        let entry = entry.map_err(|e| BuildError::io(dir, e))?;
        let path = entry.path();
        let removed = if entry.file_type().is_ok_and(|t| t.is_dir()) {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.map_err(|e| BuildError::io(&path, e))?;
    }
    Ok(())
}
