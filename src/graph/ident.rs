//! Node identity: persistent locators, blank ids, and fresh local ids.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::config::GraphConfig;

use super::container::Graph;
use super::vocab::Vocab;

static BLANK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^_:b\d+$").unwrap());
static PERSISTENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?:.+/meta/[0-9a-f-]{36}$").unwrap());

/// Prefix for locally minted ids, distinct from server-assigned `_:b` blanks.
const LOCAL_ID_PREFIX: &str = "_:stored";

/// Server-assigned blank node id, scoped to one container.
pub fn is_blank_id(id: &str) -> bool {
    BLANK_ID.is_match(id)
}

/// Full resource locator ending in a fixed-format token.
pub fn is_persistent_id(id: &str) -> bool {
    PERSISTENT_ID.is_match(id)
}

fn uuidgen() -> Uuid {
    Uuid::now_v7()
}

/// Mints persistent locators and blank nodes against configured endpoint
/// roots.
#[derive(Clone, Debug)]
pub struct Minter {
    base_url: String,
    api_root: String,
}

impl Minter {
    pub fn new(config: &GraphConfig) -> Minter {
        Minter {
            base_url: config.base_url.clone(),
            api_root: config.api_root.clone(),
        }
    }

    /// Resolve any token-bearing value to a full persistent locator.
    ///
    /// A sequence is drained from the front until an element yields a
    /// non-empty short id; a node resolves through its own short id; a plain
    /// string is the token itself. A token that already carries the `/meta/`
    /// segment passes through unchanged.
    pub fn uri_for(&self, source: Value) -> String {
        let token = match source {
            Value::Array(mut list) => {
                let mut token = String::new();
                while token.is_empty() && !list.is_empty() {
                    token = Graph::from(list.remove(0)).short_subject_id();
                }
                token
            }
            Value::Object(_) => Graph::from(source).short_subject_id(),
            Value::String(token) => token,
            _ => String::new(),
        };
        if token.to_ascii_lowercase().contains("/meta/") {
            return token;
        }
        format!("{}{}/meta/{}", self.base_url, self.api_root, token)
    }

    /// Build a blank node with a freshly minted locator.
    ///
    /// Every key in `keys` is initialized to a single empty-string element so
    /// bound views have a slot to write into.
    pub fn blank_node(&self, vocab: &Vocab, ty: &str, keys: &[&str]) -> Value {
        let id = uuidgen();
        let mut node = Map::new();
        node.insert(
            "@id".to_owned(),
            Value::String(self.uri_for(Value::String(id.to_string()))),
        );
        node.insert("@type".to_owned(), Value::String(vocab.resolve(ty)));
        for key in keys {
            node.insert(vocab.resolve(key), json!([""]));
        }
        Value::Object(node)
    }

    /// Like [`blank_node`](Minter::blank_node), wrapped as a one-node framed
    /// container.
    pub fn blank_graph(&self, vocab: &Vocab, ty: &str, keys: &[&str]) -> Graph {
        Graph::from(json!({"@graph": [self.blank_node(vocab, ty, keys)]}))
    }
}

impl Graph {
    /// Draw a local id that collides with nothing in this container.
    ///
    /// Retries are unbounded; the candidate space is rechecked against the
    /// container on every draw.
    pub fn fresh_local_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = format!("{LOCAL_ID_PREFIX}{}", rng.gen_range(0..10_000));
            if !self.ids().contains(&candidate.as_str()) {
                return candidate;
            }
        }
    }
}
