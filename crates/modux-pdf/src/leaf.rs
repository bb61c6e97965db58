//! First-page leaf hash

use lopdf::Document;
use modux_types::LeafHash;

use crate::canonical::page_buffer;
use crate::error::PdfError;
use crate::options::HashOptions;

/// Leaf hash of a document plus how it was derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafDigest {
    pub leaf: LeafHash,
    /// Content streams found on the first page
    pub streams: usize,
    /// Size of the hashed buffer
    pub canonical_bytes: usize,
    /// Whether the whole-document serialization was hashed instead
    pub blank_page_fallback: bool,
}

/// Parse `bytes` as a PDF and hash its first page
pub fn hash_first_page(bytes: &[u8], options: &HashOptions) -> Result<LeafDigest, PdfError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;
    hash_document(&doc, options)
}

/// Hash the first page of an already parsed document
pub fn hash_document(doc: &Document, options: &HashOptions) -> Result<LeafDigest, PdfError> {
    if doc.trailer.has(b"Encrypt") {
        return Err(PdfError::Encrypted);
    }

    let page_id = doc
        .get_pages()
        .into_values()
        .next()
        .ok_or(PdfError::NoPages)?;

    let buffer = page_buffer(doc, page_id, options)?;
    let leaf = LeafHash::of(&buffer.bytes);

    tracing::debug!(
        leaf = %leaf,
        page = ?page_id,
        streams = buffer.streams,
        visited = buffer.visited,
        bytes = buffer.bytes.len(),
        fallback = buffer.blank_page_fallback,
        "Hashed first page"
    );

    Ok(LeafDigest {
        leaf,
        streams: buffer.streams,
        canonical_bytes: buffer.bytes.len(),
        blank_page_fallback: buffer.blank_page_fallback,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::fixtures::{content, with_contents};
    use proptest::prelude::*;

    proptest! {
        /// Property: changing one byte of a content stream changes the leaf
        #[test]
        fn single_byte_change_detected(
            data in prop::collection::vec(any::<u8>(), 1..256),
            index in any::<prop::sample::Index>(),
            mask in 1u8..=255,
        ) {
            let mut changed = data.clone();
            let i = index.index(changed.len());
            changed[i] ^= mask;

            let original = with_contents(vec![((10, 0), content(&data))]);
            let tampered = with_contents(vec![((10, 0), content(&changed))]);
            let a = hash_document(&original, &HashOptions::default()).unwrap();
            let b = hash_document(&tampered, &HashOptions::default()).unwrap();
            prop_assert_ne!(a.leaf, b.leaf);
        }

        /// Property: the order streams are listed in never affects the leaf
        #[test]
        fn listing_order_invariant(
            bodies in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..32), 1..8),
        ) {
            let streams: Vec<_> = bodies
                .iter()
                .enumerate()
                .map(|(i, body)| ((100 + i as u32, 0), content(body)))
                .collect();
            let mut reversed = streams.clone();
            reversed.reverse();

            let a = hash_document(&with_contents(streams), &HashOptions::default()).unwrap();
            let b = hash_document(&with_contents(reversed), &HashOptions::default()).unwrap();
            prop_assert_eq!(a.leaf, b.leaf);
        }
    }
}
