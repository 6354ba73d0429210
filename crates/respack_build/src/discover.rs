//! Declaration file discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BuildError;

/// File extensions that mark resource declaration files.
pub const DECLARATION_EXTENSIONS: &[&str] = &["resource", "resources"];

/// Directories excluded from discovery.
///
/// Paths are canonicalized once on construction; directories that do not
/// exist cannot contain declarations and are dropped.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    dirs: Vec<PathBuf>,
}

impl IgnoreSet {
    /// Builds the set from configured ignore paths.
    pub fn new<'a>(dirs: impl IntoIterator<Item = &'a PathBuf>) -> Self {
        let dirs = dirs
            .into_iter()
            .filter_map(|dir| dir.canonicalize().ok())
            .collect();
        Self { dirs }
    }

    /// Returns `true` if `path` is one of the ignored directories.
    ///
    /// `path` must already be canonical.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.dirs.iter().any(|dir| dir == path)
    }
}

/// Recursively collects declaration files below `root`, sorted by path.
///
/// Ignored directories and everything below them are never entered.
/// Unreadable entries are logged and skipped.
pub fn discover_declarations(root: &Path, ignore: &IgnoreSet) -> Result<Vec<PathBuf>, BuildError> {
    let root = root
        .canonicalize()
        .map_err(|e| BuildError::io(root, e))?;

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && ignore.is_ignored(entry.path())));

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if entry.file_type().is_file() && is_declaration(entry.path()) {
            log::debug!("found declaration {}", entry.path().display());
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Returns `true` if `path` has a declaration file extension.
pub fn is_declaration(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DECLARATION_EXTENSIONS.contains(&ext))
}
