//! SHA-256 digest helpers
//!
//! Every hash in the system (leaf hashes and Merkle fold steps) goes through
//! [`sha256_hex`], so both subsystems always agree on the primitive.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of `bytes` as lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Digest of one document's canonical visual content.
///
/// Always 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafHash(String);

impl LeafHash {
    /// Hash a canonical buffer into a leaf
    pub fn of(buffer: &[u8]) -> Self {
        Self(sha256_hex(buffer))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeafHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
