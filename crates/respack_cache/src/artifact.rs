//! Intermediate artifact storage.
//!
//! Converted artifacts live directly in the intermediate directory as
//! `<index>.r`. Indices come from the manifest's monotonic counter, so two
//! distinct cache entries never share a file.

use std::path::{Path, PathBuf};

use crate::error::CacheError;

/// File extension of intermediate artifacts.
const ARTIFACT_EXT: &str = "r";

/// Flat store of numbered artifact files.
#[derive(Debug, Clone)]
pub struct IntermediateStore {
    /// Root intermediate directory.
    dir: PathBuf,
}

impl IntermediateStore {
    /// Creates a store rooted at the given intermediate directory.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Ensures that the intermediate directory exists.
    pub fn ensure_dir(&self) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })
    }

    /// Returns the root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file name used for the artifact with the given index.
    pub fn file_name(index: u64) -> String {
        format!("{index}.{ARTIFACT_EXT}")
    }

    /// Returns the full path of an artifact file name.
    pub fn artifact_path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Returns `true` if the artifact exists and is non-empty.
    ///
    /// A zero-length artifact is what a converter that failed half-way
    /// leaves behind, so it is never considered usable.
    pub fn is_valid(&self, file: &str) -> bool {
        std::fs::metadata(self.artifact_path(file))
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Returns one past the highest artifact index present in the directory,
    /// or 0 when there is none.
    ///
    /// Files that are not named `<index>.r` are ignored.
    pub fn next_free_index(&self) -> Result<u64, CacheError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        let mut next = 0;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: self.dir.clone(),
                source: e,
            })?;
            let name = entry.file_name();
            let index = name
                .to_str()
                .and_then(|name| name.strip_suffix(ARTIFACT_EXT))
                .and_then(|stem| stem.strip_suffix('.'))
                .and_then(|digits| digits.parse::<u64>().ok());
            if let Some(index) = index {
                next = next.max(index + 1);
            }
        }
        Ok(next)
    }

    /// Removes an artifact if it exists.
    ///
    /// Returns `true` if a file was removed.
    pub fn remove(&self, file: &str) -> Result<bool, CacheError> {
        let path = self.artifact_path(file);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }
}
