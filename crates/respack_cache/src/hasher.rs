//! Source file and parameter hashing.

use std::path::Path;

use respack_common::ContentHash;
use serde_json::Value;

use crate::error::CacheError;

/// Utility for computing the two hashes that make up a cache key.
pub struct SourceHasher;

impl SourceHasher {
    /// Computes the content hash of a single file.
    ///
    /// Reads the whole file and returns its XXH32 content hash. A missing or
    /// unreadable file is an error; the caller decides whether it is fatal.
    pub fn hash_file(path: &Path) -> Result<ContentHash, CacheError> {
        let content = std::fs::read(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(ContentHash::from_bytes(&content))
    }

    /// Computes the hash of a parameter tree.
    pub fn hash_params(params: &Value) -> ContentHash {
        respack_common::hash_params(params)
    }
}
