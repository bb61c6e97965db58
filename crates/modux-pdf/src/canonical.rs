//! Canonical byte buffer for a page
//!
//! Streams are decoded in ascending object identity order so the buffer does
//! not depend on how the walk reached them. A page with no decoded content
//! falls back to [`serialize_document`], a serialization of the whole object
//! arena with sorted dictionary keys that is stable across runs and platforms.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::PdfError;
use crate::filters::{decode_stream, FilterError};
use crate::graph::ObjectGraph;
use crate::options::HashOptions;
use crate::walker::{collect_streams, StreamRecord};

/// Bytes to be hashed for one page, with provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalBuffer {
    pub bytes: Vec<u8>,
    /// Content streams discovered by the walk
    pub streams: usize,
    /// Distinct indirect objects the walk visited
    pub visited: usize,
    /// Set when `bytes` is the whole-document serialization
    pub blank_page_fallback: bool,
}

/// Build the canonical buffer for the page `page_id` of `doc`
pub fn page_buffer(
    doc: &Document,
    page_id: ObjectId,
    options: &HashOptions,
) -> Result<CanonicalBuffer, PdfError> {
    let outcome = collect_streams(doc, page_id, options)?;
    let streams = outcome.streams.len();
    let visited = outcome.visited;

    let bytes = concat_streams(doc, outcome.streams, options)?;
    if !bytes.is_empty() {
        return Ok(CanonicalBuffer {
            bytes,
            streams,
            visited,
            blank_page_fallback: false,
        });
    }

    tracing::debug!(streams, "Page has no decoded content, hashing whole document");
    let bytes = serialize_document(doc);
    check_size(bytes.len(), options)?;
    Ok(CanonicalBuffer {
        bytes,
        streams,
        visited,
        blank_page_fallback: true,
    })
}

/// Decode `records` in canonical order and concatenate them
pub fn concat_streams<G: ObjectGraph + ?Sized>(
    graph: &G,
    mut records: Vec<StreamRecord<'_>>,
    options: &HashOptions,
) -> Result<Vec<u8>, PdfError> {
    records.sort();

    let mut buffer = Vec::new();
    for record in &records {
        let budget = options
            .max_canonical_bytes
            .map(|max| max.saturating_sub(buffer.len()));
        let decoded = decode_stream(graph, record.stream, budget).map_err(|source| match source {
            FilterError::OutputLimit { filter, .. } => PdfError::LimitExceeded(format!(
                "stream {} inflates past the canonical buffer limit via /{}",
                record.label(),
                filter
            )),
            source => PdfError::Decode {
                object: record.label(),
                source,
            },
        })?;
        check_size(buffer.len() + decoded.len(), options)?;
        tracing::trace!(
            object = %record.label(),
            encoded = record.stream.content.len(),
            decoded = decoded.len(),
            "Decoded stream"
        );
        buffer.extend_from_slice(&decoded);
    }
    Ok(buffer)
}

fn check_size(len: usize, options: &HashOptions) -> Result<(), PdfError> {
    match options.max_canonical_bytes {
        Some(max) if len > max => Err(PdfError::LimitExceeded(format!(
            "canonical buffer exceeds {} bytes",
            max
        ))),
        _ => Ok(()),
    }
}

/// Serialize every object of `doc`, then its trailer.
///
/// Objects ascend by id and dictionary keys are sorted bytewise, so two
/// documents with the same parsed objects always produce the same bytes,
/// whatever order the file stored them in.
pub fn serialize_document(doc: &Document) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("%PDF-{}\n", doc.version).as_bytes());

    // `objects` is a BTreeMap, so iteration is already in id order
    for (&(num, gen), object) in &doc.objects {
        out.extend_from_slice(format!("{} {} obj\n", num, gen).as_bytes());
        write_object(&mut out, object);
        out.extend_from_slice(b"\nendobj\n");
    }

    out.extend_from_slice(b"trailer\n");
    write_dictionary(&mut out, &doc.trailer, None);
    out.push(b'\n');
    out
}

fn write_object(out: &mut Vec<u8>, object: &Object) {
    match object {
        Object::Null => out.extend_from_slice(b"null"),
        Object::Boolean(value) => {
            let word: &[u8] = if *value { b"true" } else { b"false" };
            out.extend_from_slice(word);
        }
        Object::Integer(value) => out.extend_from_slice(value.to_string().as_bytes()),
        Object::Real(value) => out.extend_from_slice(value.to_string().as_bytes()),
        Object::Name(name) => write_name(out, name),
        // Hex form only, so literal and hex strings with equal bytes agree
        Object::String(bytes, _) => {
            out.push(b'<');
            out.extend_from_slice(hex::encode_upper(bytes).as_bytes());
            out.push(b'>');
        }
        Object::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                write_object(out, item);
            }
            out.push(b']');
        }
        Object::Dictionary(dict) => write_dictionary(out, dict, None),
        Object::Stream(stream) => {
            write_dictionary(out, &stream.dict, Some(stream.content.len()));
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(&stream.content);
            out.extend_from_slice(b"\nendstream");
        }
        Object::Reference((num, gen)) => {
            out.extend_from_slice(format!("{} {} R", num, gen).as_bytes());
        }
    }
}

/// `length` replaces any declared `/Length` with the real payload size
fn write_dictionary(out: &mut Vec<u8>, dict: &Dictionary, length: Option<usize>) {
    let length = length.map(|len| Object::Integer(len as i64));
    let mut entries: Vec<(&[u8], &Object)> = dict
        .iter()
        .filter(|(key, _)| length.is_none() || key.as_slice() != b"Length")
        .map(|(key, value)| (key.as_slice(), value))
        .collect();
    if let Some(length) = length.as_ref() {
        entries.push((b"Length".as_slice(), length));
    }
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.extend_from_slice(b"<<");
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(b' ');
        }
        write_name(out, key);
        out.push(b' ');
        write_object(out, value);
    }
    out.extend_from_slice(b">>");
}

fn write_name(out: &mut Vec<u8>, name: &[u8]) {
    out.push(b'/');
    for &byte in name {
        let delimiter = matches!(
            byte,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
        );
        if (b'!'..=b'~').contains(&byte) && !delimiter {
            out.push(byte);
        } else {
            out.extend_from_slice(format!("#{:02X}", byte).as_bytes());
        }
    }
}
