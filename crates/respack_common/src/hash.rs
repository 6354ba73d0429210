//! Content hashing for cache identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seed shared by every hash computed by the pipeline.
///
/// Changing it invalidates every cache key ever written.
pub const HASH_SEED: u32 = 1337;

/// A 32-bit content hash computed using XXH32.
///
/// Two inputs with the same `ContentHash` are assumed to be identical for the
/// purposes of cache key construction. The cache never trusts the hash alone
/// for parameter trees; see [`params_equivalent`](crate::params_equivalent).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(u32);

impl ContentHash {
    /// The hash used for objects that skip hashing entirely.
    pub const ZERO: ContentHash = ContentHash(0);

    /// Computes a content hash from a byte slice using XXH32.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh32::xxh32(data, HASH_SEED))
    }

    /// Wraps a raw hash value.
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw 32-bit value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:08x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::from_bytes(b"hello world");
        let b = ContentHash::from_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = ContentHash::from_bytes(b"hello");
        let b = ContentHash::from_bytes(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_hash_differs_from_unseeded() {
        let seeded = ContentHash::from_bytes(b"texture");
        let unseeded = xxhash_rust::xxh32::xxh32(b"texture", 0);
        assert_ne!(seeded.value(), unseeded);
    }

    #[test]
    fn display_is_decimal() {
        let h = ContentHash::from_raw(42);
        assert_eq!(h.to_string(), "42");
        assert_eq!(format!("{h:?}"), "ContentHash(0000002a)");
    }

    #[test]
    fn serde_is_a_plain_number() {
        let h = ContentHash::from_raw(7);
        assert_eq!(serde_json::to_string(&h).unwrap(), "7");
        let back: ContentHash = serde_json::from_str("7").unwrap();
        assert_eq!(back, h);
    }
}
