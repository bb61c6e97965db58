//! Human and machine readable verification output

use modux_merkle::Verification;
use modux_pdf::LeafDigest;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Three lines: leaf hash, proof root, verdict
    #[default]
    Text,
    /// One JSON object
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub leaf_hash: String,
    /// Root exactly as the proof document states it
    pub merkle_root: String,
    pub computed_root: String,
    pub valid: bool,
    pub streams: usize,
    pub canonical_bytes: usize,
    pub blank_page_fallback: bool,
}

impl VerificationReport {
    pub fn new(digest: &LeafDigest, verification: Verification) -> Self {
        Self {
            leaf_hash: digest.leaf.to_string(),
            merkle_root: verification.expected_root,
            computed_root: verification.computed_root,
            valid: verification.valid,
            streams: digest.streams,
            canonical_bytes: digest.canonical_bytes,
            blank_page_fallback: digest.blank_page_fallback,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    fn to_text(&self) -> String {
        let verdict = if self.valid {
            "✅ Proof is valid"
        } else {
            "❌ Invalid proof"
        };
        format!(
            "• File hash: {}\n• Merkle root in proof: {}\n{}",
            self.leaf_hash, self.merkle_root, verdict
        )
    }
}
