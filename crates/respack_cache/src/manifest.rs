//! The persisted cache manifest.
//!
//! The manifest is stored as `intermediate.data` in the intermediate
//! directory. It records the next free artifact index and, per cache key,
//! the parameters the artifact was built with and its file name.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CacheError;
use crate::key::CacheKey;

/// Name of the manifest file within the intermediate directory.
pub const MANIFEST_FILE: &str = "intermediate.data";

/// Top-level cache manifest.
///
/// Rewritten in full at the end of every run. A crash mid-build leaves the
/// previous manifest in place; artifacts are only ever added, so the previous
/// manifest stays consistent with the directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheManifest {
    /// The index that the next freshly allocated artifact will receive.
    #[serde(rename = "next-idx", default)]
    pub next_idx: u64,

    /// Recorded conversions, keyed by cache key.
    #[serde(default)]
    pub metadata: BTreeMap<CacheKey, CacheEntry>,
}

/// A single recorded conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The parameters the artifact was converted with.
    pub params: Value,

    /// Artifact file name, relative to the intermediate directory.
    pub file: String,
}

impl CacheManifest {
    /// Creates a new, empty cache manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the manifest from the intermediate directory, returning `None`
    /// if the file doesn't exist or can't be parsed.
    ///
    /// This is fail-safe: any error results in `None`, triggering a full
    /// rebuild.
    pub fn load(intermediate_dir: &Path) -> Option<Self> {
        let path = intermediate_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                log::warn!("ignoring unreadable cache manifest {}: {e}", path.display());
                None
            }
        }
    }

    /// Saves the manifest to the intermediate directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn save(&self, intermediate_dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(intermediate_dir).map_err(|e| CacheError::Io {
            path: intermediate_dir.to_path_buf(),
            source: e,
        })?;
        let path = intermediate_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| CacheError::Io { path, source: e })
    }
}
