//! The build object model.

use std::path::PathBuf;

use respack_cache::CacheKey;
use respack_common::ContentHash;
use serde_json::Value;

/// Where an object stands in the current run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ObjectStatus {
    /// Not yet converted.
    #[default]
    Pending,
    /// Reused from the intermediate cache.
    Cached,
    /// Converted in this run.
    Converted,
    /// Failed; excluded from the package. Holds the reason.
    Failed(String),
}

/// One declared resource to be converted into a packaged artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildObject {
    /// Unique among all final objects.
    pub name: String,
    /// Selects the converter and, optionally, an expander.
    pub object_type: String,
    /// Source file, resolved relative to the declaring file.
    pub source_file: PathBuf,
    /// Content hash of `source_file`; zero until hashed.
    pub source_hash: ContentHash,
    /// Parameters forwarded to the converter.
    pub params: Value,
    /// Hash of the serialized parameters; zero until hashed.
    pub params_hash: ContentHash,
    /// Bypass the cache unconditionally.
    pub force_retranslate: bool,
    /// Set on a cache hit.
    pub skip_conversion: bool,
    /// The converted artifact in the intermediate directory, once assigned.
    pub intermediate_file: Option<PathBuf>,
    /// Final location under the output directory.
    pub dest_file: PathBuf,
    /// Size of `dest_file` after the copy.
    pub dest_size: u64,
    /// The declaration file this object came from.
    pub declaration_origin: PathBuf,
    /// Variant tag for objects produced by expansion.
    pub subtype: Option<String>,
    /// Outcome so far.
    pub status: ObjectStatus,
}

impl BuildObject {
    /// Creates an object as it appears in a declaration, before any stage ran.
    pub fn new(
        name: impl Into<String>,
        object_type: impl Into<String>,
        source_file: impl Into<PathBuf>,
        params: Value,
        declaration_origin: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            object_type: object_type.into(),
            source_file: source_file.into(),
            source_hash: ContentHash::ZERO,
            params,
            params_hash: ContentHash::ZERO,
            force_retranslate: false,
            skip_conversion: false,
            intermediate_file: None,
            dest_file: PathBuf::new(),
            dest_size: 0,
            declaration_origin: declaration_origin.into(),
            subtype: None,
            status: ObjectStatus::Pending,
        }
    }

    /// The cache key for the object's current hashes.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            &self.name,
            &self.object_type,
            self.source_hash,
            self.params_hash,
        )
    }

    /// Marks the object as failed.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = ObjectStatus::Failed(reason.into());
    }

    /// Returns `true` once the object has failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ObjectStatus::Failed(_))
    }

    /// Returns `true` if the object made it into the package.
    pub fn is_packaged(&self) -> bool {
        matches!(self.status, ObjectStatus::Cached | ObjectStatus::Converted)
    }
}
