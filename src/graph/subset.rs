//! Collection nodes: auxiliary nodes holding an ordered element list,
//! linked from the subject by a blank reference.

use anyhow::Result;
use serde_json::{Map, Value, json};
use tokio::task::JoinSet;
use tracing::warn;

use crate::client::AssetSource;

use super::container::Graph;
use super::ident::Minter;
use super::vocab::Vocab;

const ELEMENT_KEY: &str = "element";

#[derive(Clone, Copy, Debug)]
pub struct SubsetOptions<'a> {
    /// Remove the collection node (and the subject's link to it) after
    /// reading.
    pub remove: bool,
    /// Short predicate key holding the element list on the collection node.
    pub element_key: &'a str,
}

impl Default for SubsetOptions<'_> {
    fn default() -> Self {
        SubsetOptions {
            remove: false,
            element_key: ELEMENT_KEY,
        }
    }
}

/// An extracted element list plus its outstanding enrichment fetches.
///
/// [`items`](Subset::items) is the snapshot available at extraction time.
/// Await [`settle`](Subset::settle) for the fully enriched list; dropping a
/// `Subset` instead aborts whatever is still in flight.
pub struct Subset {
    items: Vec<Value>,
    pending: JoinSet<(usize, Result<Value>)>,
}

impl Subset {
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Join every outstanding fetch and substitute each result into its
    /// slot. A failed fetch keeps the original placeholder element.
    pub async fn settle(mut self) -> Vec<Value> {
        while let Some(joined) = self.pending.join_next().await {
            match joined {
                Ok((slot, Ok(asset))) => {
                    if let Some(item) = self.items.get_mut(slot) {
                        *item = asset;
                    }
                }
                Ok((slot, Err(error))) => {
                    warn!(target: "graph", %error, slot, "asset fetch failed; keeping placeholder");
                }
                Err(error) => {
                    warn!(target: "graph", %error, "asset fetch task aborted");
                }
            }
        }
        self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

// Entries the element list treats as absent.
fn is_empty_entry(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

impl Graph {
    /// Read the element list of the collection node referenced under `key`
    /// on the canonical subject.
    ///
    /// A missing reference, missing collection node, or missing element list
    /// reads as an empty list. With `remove` set, the collection node is
    /// spliced out of the container and the subject's link deleted.
    pub fn subset(&mut self, vocab: &Vocab, key: &str, opts: SubsetOptions<'_>) -> Vec<Value> {
        let full_key = vocab.resolve(key);
        let Some(reference) = self.get_value(vocab, key) else {
            return Vec::new();
        };
        let Some(ref_id) = reference.get("@id").and_then(Value::as_str) else {
            return Vec::new();
        };
        let collection = if opts.remove {
            let removed = self.remove_by_id(ref_id);
            if removed.is_some() {
                if let Some(subject) = self.subject_mut().as_object_mut() {
                    subject.remove(&full_key);
                }
            }
            removed
        } else {
            self.find_by_id(ref_id).cloned()
        };
        let Some(collection) = collection else {
            return Vec::new();
        };
        let Some(Value::Array(elements)) = Graph::from(collection).get(vocab, opts.element_key)
        else {
            return Vec::new();
        };
        elements
            .into_iter()
            .filter(|item| !is_empty_entry(item))
            .collect()
    }

    /// [`subset`](Graph::subset), plus one spawned fetch per element that
    /// carries no `@id` of its own. Must be called within a tokio runtime.
    pub fn subset_supplied<S>(
        &mut self,
        vocab: &Vocab,
        minter: &Minter,
        source: &S,
        key: &str,
        opts: SubsetOptions<'_>,
    ) -> Subset
    where
        S: AssetSource + Clone + Send + 'static,
    {
        let items = self.subset(vocab, key, opts);
        let mut pending = JoinSet::new();
        for (slot, item) in items.iter().enumerate() {
            if item.get("@id").is_some() {
                continue;
            }
            let iri = minter.uri_for(item.clone());
            let source = source.clone();
            pending.spawn(async move { (slot, source.fetch(&iri).await) });
        }
        Subset { items, pending }
    }

    /// Non-destructive read of a collection's elements.
    pub fn peek_subset(&mut self, vocab: &Vocab, key: &str) -> Vec<Value> {
        self.subset(vocab, key, SubsetOptions::default())
    }

    /// Destructive read: splice the collection node out and enrich id-less
    /// elements from the asset source.
    pub fn extract_subset<S>(
        &mut self,
        vocab: &Vocab,
        minter: &Minter,
        source: &S,
        key: &str,
    ) -> Subset
    where
        S: AssetSource + Clone + Send + 'static,
    {
        let opts = SubsetOptions {
            remove: true,
            ..SubsetOptions::default()
        };
        self.subset_supplied(vocab, minter, source, key, opts)
    }

    /// Store `body` as a new collection node with a fresh local id and link
    /// it from the subject under `key`.
    ///
    /// Returns the minted id, or `None` when the container holds no node
    /// sequence to append to. The type is stored as given; callers resolve
    /// short types first.
    pub fn store(&mut self, vocab: &Vocab, key: &str, ty: &str, body: Value) -> Option<String> {
        self.nodes_mut()?;
        let id = self.fresh_local_id();
        let mut node = Map::new();
        node.insert("@id".to_owned(), Value::String(id.clone()));
        node.insert("@type".to_owned(), Value::String(ty.to_owned()));
        if let Value::Object(extra) = body {
            node.extend(extra);
        }
        let full_key = vocab.resolve(key);
        self.subject_mut()
            .as_object_mut()?
            .insert(full_key, json!([{"@id": id.clone()}]));
        self.nodes_mut()?.push(Value::Object(node));
        Some(id)
    }

    /// Wrap `element_ids` as a reference list and store it as a collection
    /// node under `key`.
    ///
    /// An empty element list stores nothing and deletes `key` from the
    /// subject instead; absent, not empty, is how empty collections are
    /// represented.
    pub fn wrap_and_store(
        &mut self,
        vocab: &Vocab,
        minter: &Minter,
        element_ids: Vec<Value>,
        key: &str,
        collection_type: &str,
    ) -> Option<String> {
        if element_ids.is_empty() {
            let full_key = vocab.resolve(key);
            if let Some(subject) = self.subject_mut().as_object_mut() {
                subject.remove(&full_key);
            }
            return None;
        }
        let references: Vec<Value> = element_ids
            .into_iter()
            .map(|element| json!({"@id": minter.uri_for(element)}))
            .collect();
        let mut body = Map::new();
        body.insert(vocab.resolve(ELEMENT_KEY), Value::Array(references));
        self.store(vocab, key, &vocab.resolve(collection_type), Value::Object(body))
    }
}
