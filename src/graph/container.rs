//! Graph containers and the canonical subject.

use std::slice;

use serde_json::Value;
use tracing::debug;

use super::ident::{is_blank_id, is_persistent_id};
use super::vocab::Vocab;

/// Recognized container shapes, sniffed once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    /// `{"@graph": [...]}`, the framed document shape of API responses.
    Framed,
    /// `{"_graph": [...]}`, the shape of view-bound state.
    Bound,
    /// A single node object, or anything else.
    Bare,
}

/// One graph container: an ordered node sequence with a single canonical
/// subject, or a bare node standing in for both.
///
/// Every operation takes exclusive access for its duration. Concurrent
/// mutation of one container from two call sites is unsupported.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    value: Value,
    shape: Shape,
}

impl From<Value> for Graph {
    fn from(value: Value) -> Graph {
        let shape = match value.as_object() {
            Some(map) if map.get("@graph").is_some_and(Value::is_array) => Shape::Framed,
            Some(map) if map.get("_graph").is_some_and(Value::is_array) => Shape::Bound,
            _ => Shape::Bare,
        };
        Graph { value, shape }
    }
}

impl From<Graph> for Value {
    fn from(graph: Graph) -> Value {
        graph.value
    }
}

impl Graph {
    pub fn from_value(value: Value) -> Graph {
        Graph::from(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    fn slot_key(&self) -> Option<&'static str> {
        match self.shape {
            Shape::Framed => Some("@graph"),
            Shape::Bound => Some("_graph"),
            Shape::Bare => None,
        }
    }

    /// The node sequence. A bare container is its own one-node sequence.
    pub fn nodes(&self) -> &[Value] {
        match self.slot_key() {
            Some(key) => self
                .value
                .get(key)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            None => slice::from_ref(&self.value),
        }
    }

    pub(crate) fn nodes_mut(&mut self) -> Option<&mut Vec<Value>> {
        let key = self.slot_key()?;
        self.value.get_mut(key).and_then(Value::as_array_mut)
    }

    /// Every `@id` present in the container.
    pub fn ids(&self) -> Vec<&str> {
        self.nodes()
            .iter()
            .filter_map(|node| node.get("@id").and_then(Value::as_str))
            .collect()
    }

    /// Linear scan for the node with exactly this identifier.
    pub fn find_by_id(&self, id: &str) -> Option<&Value> {
        self.nodes()
            .iter()
            .find(|node| node.get("@id").and_then(Value::as_str) == Some(id))
    }

    pub(crate) fn remove_by_id(&mut self, id: &str) -> Option<Value> {
        let nodes = self.nodes_mut()?;
        let pos = nodes
            .iter()
            .position(|node| node.get("@id").and_then(Value::as_str) == Some(id))?;
        Some(nodes.remove(pos))
    }

    /// Move the persistent node to the front when a blank node ended up
    /// physically first. Exactly one persistent node is expected; when none
    /// is found the order is left alone.
    fn correct_order(&mut self) {
        let Some(nodes) = self.nodes_mut() else {
            return;
        };
        let blank_first = nodes
            .first()
            .and_then(|node| node.get("@id"))
            .and_then(Value::as_str)
            .is_some_and(is_blank_id);
        if !blank_first {
            return;
        }
        if let Some(pos) = nodes.iter().position(|node| {
            node.get("@id")
                .and_then(Value::as_str)
                .is_some_and(is_persistent_id)
        }) {
            let canonical = nodes.remove(pos);
            nodes.insert(0, canonical);
            debug!(target: "graph", "moved canonical subject to front");
        }
    }

    /// The canonical subject node.
    ///
    /// Corrects the node order as a side effect when the canonical node is
    /// not physically first; once corrected, further calls return the same
    /// node without reordering. An empty or non-object sequence head makes
    /// the container itself the subject.
    pub fn subject_mut(&mut self) -> &mut Value {
        self.correct_order();
        let first_is_object = self.nodes().first().is_some_and(Value::is_object);
        match self.slot_key() {
            Some(key) if first_is_object => &mut self.value[key][0],
            _ => &mut self.value,
        }
    }

    pub fn subject(&mut self) -> &Value {
        self.subject_mut()
    }

    /// The subject's short id: the trailing path segment of its `@id`,
    /// falling back to a top-level `uuid` field, falling back to empty.
    pub(crate) fn short_subject_id(&mut self) -> String {
        let tail = self
            .subject_mut()
            .get("@id")
            .and_then(Value::as_str)
            .and_then(|id| id.rsplit('/').next())
            .unwrap_or_default()
            .to_owned();
        if !tail.is_empty() {
            return tail;
        }
        self.value
            .get("uuid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    }

    /// Read a predicate off the canonical subject, as stored.
    ///
    /// The pseudo-key `"id"` reads the subject's short id instead and is
    /// always `Some`, possibly of an empty string.
    pub fn get(&mut self, vocab: &Vocab, key: &str) -> Option<Value> {
        if key == "id" {
            return Some(Value::String(self.short_subject_id()));
        }
        let key = vocab.resolve(key);
        self.subject_mut().get(&key).cloned()
    }

    /// Like [`get`](Graph::get), unwrapped to the first element when the
    /// stored value is a list.
    pub fn get_value(&mut self, vocab: &Vocab, key: &str) -> Option<Value> {
        match self.get(vocab, key)? {
            Value::Array(list) => list.into_iter().next(),
            value => Some(value),
        }
    }

    /// Write a predicate on the canonical subject.
    ///
    /// A framed container value collapses to its node sequence first. A list
    /// replaces the stored list wholesale; a scalar only ever replaces index
    /// 0 and leaves the tail of a pre-existing list untouched.
    pub fn set(&mut self, vocab: &Vocab, key: &str, value: Value) {
        let key = vocab.resolve(key);
        let value = match value {
            Value::Object(mut map) if matches!(map.get("@graph"), Some(Value::Array(_))) => {
                map.remove("@graph").unwrap_or(Value::Null)
            }
            value => value,
        };
        let Some(subject) = self.subject_mut().as_object_mut() else {
            return;
        };
        match value {
            Value::Array(list) => {
                subject.insert(key, Value::Array(list));
            }
            value => {
                let slot = subject.entry(key).or_insert_with(|| Value::Array(vec![]));
                match slot {
                    Value::Array(list) if list.is_empty() => list.push(value),
                    Value::Array(list) => list[0] = value,
                    other => *other = Value::Array(vec![value]),
                }
            }
        }
    }
}
