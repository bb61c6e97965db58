//! Merkle inclusion proof verification
//!
//! Replays a proof (sibling hashes with their side) from a leaf hash up to a
//! candidate root and compares it with the root the ledger published.

pub mod verifier;

pub use verifier::{fold_proof, verify_document, verify_proof, Verification};
