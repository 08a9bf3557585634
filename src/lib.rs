//! An in-memory model for editing small JSON-LD graphs.
//!
//! A graph arrives in one of three container shapes: a framed document
//! (`{"@graph": [...]}`), view-bound state (`{"_graph": [...]}`), or a bare
//! node object. [`Graph`] normalizes the shape once and exposes uniform
//! operations on the canonical subject: predicate accessors, blank-node
//! minting, collection ("subset") extraction and storage, and inlining of
//! blank-node references.
//!
//! ```
//! use grafo::{GraphConfig, Minter, Vocab};
//! use serde_json::json;
//!
//! let config = GraphConfig::default();
//! let vocab = Vocab::new(&config);
//! let minter = Minter::new(&config);
//!
//! let mut scenario = minter.blank_graph(&vocab, "Scenario", &["displayName"]);
//! scenario.set(&vocab, "displayName", json!("Title"));
//! assert_eq!(scenario.get(&vocab, "displayName"), Some(json!(["Title"])));
//! ```

mod client;
mod config;
mod graph;

pub use client::{AssetClient, AssetSource};
pub use config::GraphConfig;
pub use graph::{Graph, Minter, Subset, SubsetOptions, Vocab, is_blank_id, is_persistent_id};
