//! Test documents built in memory with lopdf

use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use weezl::{encode::Encoder, BitOrder};

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn lzw_encode(data: &[u8]) -> Vec<u8> {
    Encoder::with_tiff_size_switch(BitOrder::Msb, 8)
        .encode(data)
        .unwrap()
}

/// Plain content stream
pub fn content(bytes: &[u8]) -> Object {
    Object::Stream(Stream::new(Dictionary::new(), bytes.to_vec()))
}

/// Flate-compressed content stream
pub fn flate_content(bytes: &[u8]) -> Object {
    let dict = Dictionary::from_iter(vec![("Filter", Object::Name(b"FlateDecode".to_vec()))]);
    Object::Stream(Stream::new(dict, deflate(bytes)))
}

/// Build a one-page document.
///
/// `build` may insert objects (explicit ids are fine) and returns the extra
/// entries of the page dictionary, e.g. `/Contents`.
pub fn one_page<F>(build: F) -> (Document, ObjectId)
where
    F: FnOnce(&mut Document) -> Vec<(&'static str, Object)>,
{
    let mut doc = Document::with_version("1.7");
    let entries = build(&mut doc);
    doc.max_id = doc.objects.keys().map(|id| id.0).max().unwrap_or(0).max(doc.max_id);

    let pages_id = doc.new_object_id();
    let mut page = Dictionary::from_iter(entries);
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
    );
    let page_id = doc.add_object(page);

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(1)),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    (doc, page_id)
}

/// One-page document whose `/Contents` lists the given objects at explicit ids
pub fn with_contents(streams: Vec<(ObjectId, Object)>) -> Document {
    let (doc, _) = one_page(|doc| {
        let refs = streams.iter().map(|(id, _)| Object::Reference(*id)).collect();
        for (id, stream) in streams {
            doc.objects.insert(id, stream);
        }
        vec![("Contents", Object::Array(refs))]
    });
    doc
}

pub fn save(doc: &mut Document) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
