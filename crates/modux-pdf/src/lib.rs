//! First-page visual content hashing
//!
//! Walks the object graph reachable from a PDF's first page, decodes every
//! content stream it finds in a traversal-independent order, and hashes the
//! result into a leaf for Merkle proof verification.
//!
//! The PDF container itself is parsed by lopdf; this crate only reads the
//! resulting object arena.

pub mod canonical;
pub mod error;
pub mod filters;
pub mod graph;
pub mod leaf;
pub mod options;
pub mod walker;

#[cfg(test)]
pub(crate) mod fixtures;

pub use canonical::{serialize_document, CanonicalBuffer};
pub use error::PdfError;
pub use graph::ObjectGraph;
pub use leaf::{hash_document, hash_first_page, LeafDigest};
pub use options::HashOptions;
pub use walker::{collect_streams, StreamRecord, WalkOutcome};
