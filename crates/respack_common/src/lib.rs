//! Shared foundational types used across the respack asset pipeline.
//!
//! This crate provides the 32-bit content hash used for cache identity and
//! helpers for hashing and comparing resource parameter trees.

#![warn(missing_docs)]

pub mod hash;
pub mod params;

pub use hash::ContentHash;
pub use params::{hash_params, params_equivalent};
