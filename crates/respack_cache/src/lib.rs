//! Content-addressed intermediate cache for the asset pipeline.
//!
//! Converted artifacts are stored in the intermediate directory under
//! monotonically numbered file names. A persisted manifest maps each cache
//! key (object name, type, source hash and parameter hash) to the artifact
//! produced for it, so unchanged resources are never converted twice.

#![warn(missing_docs)]

pub mod artifact;
pub mod cache;
pub mod error;
pub mod hasher;
pub mod key;
pub mod manifest;

pub use artifact::IntermediateStore;
pub use cache::{BuildCache, CacheDecision};
pub use error::CacheError;
pub use hasher::SourceHasher;
pub use key::CacheKey;
pub use manifest::{CacheEntry, CacheManifest, MANIFEST_FILE};
