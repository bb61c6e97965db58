//! Object graph walk from a page to every reachable stream
//!
//! Depth-first over dictionary values, array elements and resolved
//! references, with an explicit stack. Indirect objects are tracked in a
//! visited set keyed by `ObjectId`; direct objects have exactly one owner, so
//! they are reached at most once without being tracked.

use std::cmp::Ordering;
use std::collections::HashSet;

use lopdf::{Object, ObjectId, Stream};

use crate::error::PdfError;
use crate::graph::ObjectGraph;
use crate::options::HashOptions;

/// A discovered stream plus the identity used to order it.
///
/// `id` is `None` for a stream embedded directly in another object.
#[derive(Debug, Clone, Copy)]
pub struct StreamRecord<'a> {
    pub id: Option<ObjectId>,
    pub stream: &'a Stream,
}

impl StreamRecord<'_> {
    /// Human-readable identity for logs and errors
    pub fn label(&self) -> String {
        match self.id {
            Some((num, gen)) => format!("{} {} R", num, gen),
            None => "<direct>".to_string(),
        }
    }
}

impl Ord for StreamRecord<'_> {
    /// Identified streams ascend by (object number, generation); direct
    /// streams follow, ordered by their encoded bytes.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.stream.content.cmp(&other.stream.content),
        }
    }
}

impl PartialOrd for StreamRecord<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for StreamRecord<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StreamRecord<'_> {}

/// Streams found by one walk, in discovery order
#[derive(Debug, Default)]
pub struct WalkOutcome<'a> {
    pub streams: Vec<StreamRecord<'a>>,
    /// Distinct indirect objects visited
    pub visited: usize,
    /// References that pointed at nothing
    pub dangling: usize,
}

/// Collect every stream reachable from the page `page_id`
pub fn collect_streams<'a, G: ObjectGraph + ?Sized>(
    graph: &'a G,
    page_id: ObjectId,
    options: &HashOptions,
) -> Result<WalkOutcome<'a>, PdfError> {
    let mut walk = Walk::new(graph, options);
    walk.enter(page_id)?;
    walk.run()
}

/// Collect every stream reachable from an arbitrary direct object
pub fn collect_streams_from<'a, G: ObjectGraph + ?Sized>(
    graph: &'a G,
    root: &'a Object,
    options: &HashOptions,
) -> Result<WalkOutcome<'a>, PdfError> {
    let mut walk = Walk::new(graph, options);
    walk.stack.push((None, root));
    walk.run()
}

struct Walk<'a, 'o, G: ?Sized> {
    graph: &'a G,
    options: &'o HashOptions,
    visited: HashSet<ObjectId>,
    stack: Vec<(Option<ObjectId>, &'a Object)>,
    outcome: WalkOutcome<'a>,
}

impl<'a, 'o, G: ObjectGraph + ?Sized> Walk<'a, 'o, G> {
    fn new(graph: &'a G, options: &'o HashOptions) -> Self {
        Self {
            graph,
            options,
            visited: HashSet::new(),
            stack: Vec::new(),
            outcome: WalkOutcome::default(),
        }
    }

    /// Mark an indirect object visited and schedule it, unless already seen
    fn enter(&mut self, id: ObjectId) -> Result<(), PdfError> {
        if !self.visited.insert(id) {
            return Ok(());
        }

        if let Some(max) = self.options.max_objects {
            if self.visited.len() > max {
                return Err(PdfError::LimitExceeded(format!(
                    "walk visited more than {} objects",
                    max
                )));
            }
        }

        match self.graph.resolve(id) {
            Some(object) => self.stack.push((Some(id), object)),
            None => {
                self.outcome.dangling += 1;
                tracing::warn!("Skipping dangling reference {} {} R", id.0, id.1);
            }
        }
        Ok(())
    }

    fn run(mut self) -> Result<WalkOutcome<'a>, PdfError> {
        while let Some((id, object)) = self.stack.pop() {
            match object {
                Object::Reference(target) => self.enter(*target)?,
                Object::Stream(stream) => {
                    self.outcome.streams.push(StreamRecord { id, stream });
                    self.push_values(stream.dict.iter().map(|(_, v)| v));
                }
                Object::Dictionary(dict) => self.push_values(dict.iter().map(|(_, v)| v)),
                Object::Array(items) => self.push_values(items.iter()),
                Object::Null
                | Object::Boolean(_)
                | Object::Integer(_)
                | Object::Real(_)
                | Object::Name(_)
                | Object::String(..) => {}
            }
        }

        self.outcome.visited = self.visited.len();
        tracing::debug!(
            streams = self.outcome.streams.len(),
            visited = self.outcome.visited,
            dangling = self.outcome.dangling,
            "Object graph walk finished"
        );
        Ok(self.outcome)
    }

    fn push_values(&mut self, values: impl DoubleEndedIterator<Item = &'a Object>) {
        // Reversed so children pop in declaration order
        self.stack.extend(values.rev().map(|value| (None, value)));
    }
}
