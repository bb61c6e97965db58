//! Read-only lookup from object identity to parsed object

use std::collections::BTreeMap;

use lopdf::{Document, Object, ObjectId};

/// Document-wide arena of indirect objects.
///
/// `resolve` performs a single lookup; a stored object that is itself a
/// reference is returned as-is and followed by the caller.
pub trait ObjectGraph {
    fn resolve(&self, id: ObjectId) -> Option<&Object>;
}

impl ObjectGraph for Document {
    fn resolve(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }
}

impl ObjectGraph for BTreeMap<ObjectId, Object> {
    fn resolve(&self, id: ObjectId) -> Option<&Object> {
        self.get(&id)
    }
}

/// Variant name for diagnostics
pub(crate) fn kind(object: &Object) -> &'static str {
    match object {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) => "integer",
        Object::Real(_) => "real",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
    }
}

/// Follow references until a direct object is reached.
///
/// Gives up after `max_hops` to stay finite on reference loops.
pub(crate) fn resolve_direct<'a, G: ObjectGraph + ?Sized>(
    graph: &'a G,
    mut object: &'a Object,
    max_hops: usize,
) -> Option<&'a Object> {
    for _ in 0..max_hops {
        match object {
            Object::Reference(id) => object = graph.resolve(*id)?,
            direct => return Some(direct),
        }
    }
    None
}
