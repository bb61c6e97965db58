//! Modux proof verifier
//!
//! Ties the two halves together: the first-page leaf hash of a PDF and the
//! Merkle proof that the ledger root includes it.

pub mod report;

use std::fs;
use std::path::Path;

use anyhow::Context;
use modux_pdf::{hash_first_page, HashOptions, PdfError};
use modux_types::ProofDocument;

pub use report::{OutputFormat, VerificationReport};

/// Hash `pdf` and check it against `proof`
pub fn verify(
    pdf: &[u8],
    proof: &ProofDocument,
    options: &HashOptions,
) -> Result<VerificationReport, PdfError> {
    let digest = hash_first_page(pdf, options)?;
    let verification = modux_merkle::verify_document(digest.leaf.as_str(), proof);
    Ok(VerificationReport::new(&digest, verification))
}

/// Read both inputs from disk, then verify.
///
/// Both files are read and the proof parsed before any hashing starts.
pub fn verify_files(
    pdf_path: &Path,
    proof_path: &Path,
    options: &HashOptions,
) -> anyhow::Result<VerificationReport> {
    let pdf = fs::read(pdf_path)
        .with_context(|| format!("Failed to read PDF: {}", pdf_path.display()))?;
    let proof_json = fs::read(proof_path)
        .with_context(|| format!("Failed to read proof: {}", proof_path.display()))?;
    let proof = ProofDocument::from_slice(&proof_json)
        .with_context(|| format!("Failed to parse proof: {}", proof_path.display()))?;

    verify(&pdf, &proof, options)
        .with_context(|| format!("Failed to hash PDF: {}", pdf_path.display()))
}
