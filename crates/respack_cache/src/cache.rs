//! High-level cache orchestrator.
//!
//! The `BuildCache` type ties together the manifest and the intermediate
//! artifact store. It decides, per object, whether a previous conversion can
//! be reused, allocates fresh artifact slots for everything else, and records
//! successful conversions for the next run.

use std::path::{Path, PathBuf};

use respack_common::params_equivalent;
use serde_json::Value;

use crate::artifact::IntermediateStore;
use crate::error::CacheError;
use crate::key::CacheKey;
use crate::manifest::{CacheEntry, CacheManifest};

/// The outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision {
    /// A previous conversion can be reused verbatim.
    Hit {
        /// Path of the cached artifact.
        path: PathBuf,
    },
    /// The object must be converted into a freshly allocated slot.
    Miss {
        /// Path the converter must write to.
        path: PathBuf,
    },
}

impl CacheDecision {
    /// Returns the artifact path for either outcome.
    pub fn path(&self) -> &Path {
        match self {
            CacheDecision::Hit { path } | CacheDecision::Miss { path } => path,
        }
    }

    /// Returns `true` for a cache hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheDecision::Hit { .. })
    }
}

/// Cache manager for one build run.
///
/// Lookups mutate the in-memory manifest (slot allocation) and must be made
/// sequentially. The manifest is only written back by [`save`](Self::save).
pub struct BuildCache {
    /// The manifest loaded from the previous run, updated in memory.
    manifest: CacheManifest,

    /// Numbered artifact files.
    store: IntermediateStore,
}

impl BuildCache {
    /// Loads an existing cache or creates a fresh one.
    ///
    /// Creates the intermediate directory if needed. A missing or corrupt
    /// manifest results in an empty cache (full rebuild), never an error.
    pub fn load_or_create(intermediate_dir: &Path) -> Result<Self, CacheError> {
        let store = IntermediateStore::new(intermediate_dir);
        store.ensure_dir()?;

        let mut manifest = match CacheManifest::load(intermediate_dir) {
            Some(manifest) => manifest,
            None => {
                log::info!("no previous intermediate data, converting everything");
                CacheManifest::new()
            }
        };
        // Never hand out a slot whose file is already on disk.
        let on_disk = store.next_free_index()?;
        if on_disk > manifest.next_idx {
            log::debug!("advancing next-idx from {} to {on_disk}", manifest.next_idx);
            manifest.next_idx = on_disk;
        }

        Ok(Self { manifest, store })
    }

    /// Decides whether the object identified by `key` can reuse a cached artifact.
    ///
    /// A hit requires the key to be recorded, `force` to be false, the
    /// recorded parameters to be structurally equal to `params`, and the
    /// recorded artifact to still exist. Hash equality alone is never
    /// trusted. Every other case allocates a new, never-reused slot. When a
    /// forced object replaces a recorded artifact, the old artifact and its
    /// entry are dropped.
    pub fn lookup(
        &mut self,
        key: &CacheKey,
        params: &Value,
        force: bool,
    ) -> Result<CacheDecision, CacheError> {
        if let Some(entry) = self.manifest.metadata.get(key) {
            if force {
                let stale = entry.file.clone();
                self.manifest.metadata.remove(key);
                if self.store.remove(&stale)? {
                    log::debug!("removed stale artifact {stale} for forced {key}");
                }
            } else if !params_equivalent(&entry.params, params) {
                log::debug!("parameter mismatch under {key}, reconverting");
            } else if !self.store.is_valid(&entry.file) {
                log::warn!("cached artifact {} for {key} is missing or empty", entry.file);
            } else {
                return Ok(CacheDecision::Hit {
                    path: self.store.artifact_path(&entry.file),
                });
            }
        }

        Ok(CacheDecision::Miss {
            path: self.allocate(),
        })
    }

    /// Allocates a fresh artifact slot and advances the counter.
    fn allocate(&mut self) -> PathBuf {
        let file = IntermediateStore::file_name(self.manifest.next_idx);
        self.manifest.next_idx += 1;
        self.store.artifact_path(&file)
    }

    /// Records a successful conversion (or a confirmed hit) under `key`.
    ///
    /// Overwrites any existing entry for the key. `artifact` must live in
    /// the intermediate directory.
    pub fn record(&mut self, key: CacheKey, params: Value, artifact: &Path) {
        let file = artifact
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.manifest.metadata.insert(key, CacheEntry { params, file });
    }

    /// Persists the manifest, including the final `next-idx`.
    pub fn save(&self) -> Result<(), CacheError> {
        self.manifest.save(self.store.dir())
    }

    /// Returns a reference to the current cache manifest.
    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    /// Returns the intermediate artifact store.
    pub fn store(&self) -> &IntermediateStore {
        &self.store
    }
}
