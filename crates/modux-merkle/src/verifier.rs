//! Left-fold of a proof path over hex-encoded hashes
//!
//! Each step hashes the UTF-8 bytes of two concatenated hex strings, not the
//! decoded binary digests. Only the leaf is lowercased before folding; sibling
//! hashes are used exactly as supplied.

use modux_types::{sha256_hex, ProofDocument, ProofStep};
use serde::Serialize;

/// Outcome of checking a proof document against a leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Root recomputed from the leaf and proof path
    pub computed_root: String,
    /// Root as given in the proof document
    pub expected_root: String,
    pub valid: bool,
}

/// Recompute the root implied by `leaf` and `proof`.
///
/// An empty proof returns the lowercased leaf itself.
pub fn fold_proof(leaf: &str, proof: &[ProofStep]) -> String {
    proof
        .iter()
        .fold(leaf.to_ascii_lowercase(), |current, step| {
            let joined = if step.left {
                format!("{}{}", step.hash, current)
            } else {
                format!("{}{}", current, step.hash)
            };
            sha256_hex(joined.as_bytes())
        })
}

/// Check whether `leaf` is included under `expected_root`
pub fn verify_proof(leaf: &str, proof: &[ProofStep], expected_root: &str) -> bool {
    roots_match(&fold_proof(leaf, proof), expected_root)
}

/// Check a parsed proof document against a leaf hash
pub fn verify_document(leaf: &str, document: &ProofDocument) -> Verification {
    let computed_root = fold_proof(leaf, &document.proof);
    let valid = roots_match(&computed_root, &document.merkle_root);

    tracing::debug!(
        steps = document.proof.len(),
        computed_root = %computed_root,
        valid,
        "Replayed merkle proof"
    );

    Verification {
        computed_root,
        expected_root: document.merkle_root.clone(),
        valid,
    }
}

fn roots_match(computed: &str, expected: &str) -> bool {
    computed.to_ascii_lowercase() == expected.to_ascii_lowercase()
}
