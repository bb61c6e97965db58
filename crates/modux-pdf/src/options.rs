//! Resource limits for a hashing run
//!
//! The core places no bounds on its own; whoever hands in the parsed document
//! decides how much of it may be walked and buffered.

/// Bounds applied while walking and canonicalizing one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashOptions {
    /// Maximum distinct indirect objects the walker may visit
    pub max_objects: Option<usize>,
    /// Maximum size of the decoded canonical buffer, in bytes
    pub max_canonical_bytes: Option<usize>,
}

impl HashOptions {
    /// No limits at all
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_objects(mut self, max: usize) -> Self {
        self.max_objects = Some(max);
        self
    }

    pub fn with_max_canonical_bytes(mut self, max: usize) -> Self {
        self.max_canonical_bytes = Some(max);
        self
    }
}
