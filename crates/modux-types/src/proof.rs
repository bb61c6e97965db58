//! Merkle inclusion proof document

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// One step of an inclusion proof: a sibling hash and which side it sits on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling hash as hex text, used exactly as supplied
    pub hash: String,
    /// `true` when the sibling is the left operand of the pair
    #[serde(default)]
    pub left: bool,
}

impl ProofStep {
    pub fn left(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            left: true,
        }
    }

    pub fn right(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            left: false,
        }
    }
}

/// Ordered proof steps, applied from leaf toward root
pub type Proof = Vec<ProofStep>;

/// The proof document handed out alongside a signed PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofDocument {
    pub proof: Proof,
    pub merkle_root: String,
}

impl ProofDocument {
    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, TypesError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Deserialize from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, TypesError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
