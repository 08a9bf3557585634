//! Short predicate and type keys, expanded against configured namespaces.

use crate::config::GraphConfig;

/// Namespace table for one ontology.
///
/// Built from configuration rather than hardcoded roots, so two `Vocab`
/// values can serve two APIs side by side.
#[derive(Clone, Debug)]
pub struct Vocab {
    base: String,
    core: String,
}

impl Vocab {
    pub fn new(config: &GraphConfig) -> Vocab {
        let base = config.ontology_base.clone();
        let core = format!("{base}core#");
        Vocab { base, core }
    }

    /// The ontology namespace root.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Expand a short key to its full namespaced form.
    ///
    /// Keys already carrying a scheme prefix pass through unchanged, so
    /// resolution is idempotent. A key with a namespace separator is rooted
    /// at the ontology base, everything else lands in the `core#` namespace.
    /// No validation happens here; a malformed key expands to a malformed
    /// full key.
    pub fn resolve(&self, key: &str) -> String {
        if key.starts_with("http") {
            return key.to_owned();
        }
        if key.contains(['#', ':']) {
            return format!("{}{}", self.base, key);
        }
        format!("{}{}", self.core, key)
    }

    /// Full key in the `display#` namespace.
    pub fn display(&self, name: &str) -> String {
        format!("{}display#{}", self.base, name)
    }
}
