//! Shared types for modux verification
//!
//! Holds the digest primitive used by both the leaf hasher and the Merkle
//! verifier, plus the proof document model.

pub mod digest;
pub mod error;
pub mod proof;

pub use digest::{sha256_hex, LeafHash};
pub use error::TypesError;
pub use proof::{Proof, ProofDocument, ProofStep};
