//! Cache key construction.

use std::fmt;

use respack_common::ContentHash;
use serde::{Deserialize, Serialize};

/// Separator between the four components of a cache key.
const KEY_SEPARATOR: &str = "|||";

/// The identity of one conversion: `name|||type|||sourceHash|||paramsHash`.
///
/// Hashes are written in decimal. The key alone does not prove a hit; the
/// stored parameters must also match (see [`BuildCache::lookup`](crate::BuildCache::lookup)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for an object.
    pub fn new(
        name: &str,
        object_type: &str,
        source_hash: ContentHash,
        params_hash: ContentHash,
    ) -> Self {
        Self(format!(
            "{name}{KEY_SEPARATOR}{object_type}{KEY_SEPARATOR}{source_hash}{KEY_SEPARATOR}{params_hash}"
        ))
    }

    /// Returns the key as stored in the manifest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
