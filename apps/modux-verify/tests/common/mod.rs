//! PDF and proof fixtures shared by the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use lopdf::{Dictionary, Document, Object, Stream};
use modux_merkle::fold_proof;
use modux_types::{sha256_hex, ProofDocument, ProofStep};
use tempfile::TempDir;

/// Serialized one-page PDF whose page draws `content`; empty content leaves
/// the page blank
pub fn pdf_with_content(content: &[u8]) -> Vec<u8> {
    let stream = (!content.is_empty()).then(|| Stream::new(Dictionary::new(), content.to_vec()));
    pdf_with_stream(stream)
}

/// Serialized one-page PDF with `stream` as its `/Contents`
pub fn pdf_with_stream(stream: Option<Stream>) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
    ]);
    if let Some(stream) = stream {
        let content_id = doc.add_object(stream);
        page.set("Contents", Object::Reference(content_id));
    }
    let page_id = doc.add_object(page);

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(1)),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Proof placing the leaf at index 0 of a four-leaf tree
pub fn proof_for(leaf: &str) -> ProofDocument {
    let proof = vec![
        ProofStep::right(sha256_hex(b"neighbour")),
        ProofStep::right(sha256_hex(b"other half")),
    ];
    let merkle_root = fold_proof(leaf, &proof);
    ProofDocument { proof, merkle_root }
}

/// Write both inputs into a fresh temp dir; keep the dir alive while in use
pub fn write_inputs(pdf: &[u8], proof: &ProofDocument) -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let pdf_path = dir.path().join("lease.pdf");
    let proof_path = dir.path().join("lease.proof.json");
    fs::write(&pdf_path, pdf).unwrap();
    fs::write(&proof_path, proof.to_json().unwrap()).unwrap();
    (dir, pdf_path, proof_path)
}
