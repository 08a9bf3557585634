//! Replace blank-node references on the subject with the referenced nodes.

use serde_json::Value;

use super::container::Graph;
use super::ident::is_blank_id;

impl Graph {
    /// Inline blank references on the canonical subject from this graph's
    /// own nodes.
    ///
    /// One pass, one level deep: an inlined node's own references are left
    /// alone, and a reference with no matching node keeps its placeholder.
    pub fn inline_refs(&mut self) {
        let targets = self.blank_ref_targets();
        let mut resolved = Vec::with_capacity(targets.len());
        for (key, id) in targets {
            if let Some(node) = self.find_by_id(&id) {
                resolved.push((key, node.clone()));
            }
        }
        self.write_inlined(resolved);
    }

    /// Like [`inline_refs`](Graph::inline_refs), resolving against a
    /// separate source graph.
    pub fn inline_refs_from(&mut self, source: &Graph) {
        let resolved = self
            .blank_ref_targets()
            .into_iter()
            .filter_map(|(key, id)| source.find_by_id(&id).map(|node| (key, node.clone())))
            .collect();
        self.write_inlined(resolved);
    }

    // Predicate keys on the subject whose first value references a blank id.
    // Only full-locator keys participate.
    fn blank_ref_targets(&mut self) -> Vec<(String, String)> {
        let Some(subject) = self.subject_mut().as_object() else {
            return Vec::new();
        };
        subject
            .iter()
            .filter(|(key, _)| key.starts_with("http"))
            .filter_map(|(key, value)| {
                let id = value.get(0)?.get("@id")?.as_str()?;
                is_blank_id(id).then(|| (key.clone(), id.to_owned()))
            })
            .collect()
    }

    fn write_inlined(&mut self, resolved: Vec<(String, Value)>) {
        if resolved.is_empty() {
            return;
        }
        let Some(subject) = self.subject_mut().as_object_mut() else {
            return;
        };
        for (key, node) in resolved {
            if let Some(slot) = subject.get_mut(&key).and_then(|value| value.get_mut(0)) {
                *slot = node;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Graph;

    fn scenario_with_collection() -> Graph {
        Graph::from(json!({
            "@graph": [
                {
                    "@id": "http://sample.domain/api/meta/b35fc8ee-1f65-4884-afc4-593e5fa0aa47",
                    "@type": "http://sample.domain/ontologies/core#Scenario",
                    "http://sample.domain/ontologies/display#collections": [{"@id": "_:b5"}]
                },
                {
                    "@id": "_:b5",
                    "@type": "http://sample.domain/ontologies/access#CollectionSet",
                    "http://sample.domain/ontologies/core#element": [
                        "e4108e4b-6b29-4b27-bb72-a6ebaf5ba43c",
                        "58e34951-2dcd-4e05-b660-803be70ed538"
                    ]
                }
            ]
        }))
    }

    #[test]
    fn blank_reference_is_replaced_with_the_node() {
        let mut graph = scenario_with_collection();
        let collection = graph.find_by_id("_:b5").unwrap().clone();
        graph.inline_refs();
        assert_eq!(
            graph.subject()["http://sample.domain/ontologies/display#collections"][0],
            collection
        );
        // The referenced node itself stays in the graph.
        assert!(graph.find_by_id("_:b5").is_some());
    }

    #[test]
    fn graph_without_blank_references_is_unchanged() {
        let mut graph = Graph::from(json!({
            "@graph": [{
                "@id": "http://sample.domain/api/meta/b35fc8ee-1f65-4884-afc4-593e5fa0aa47",
                "http://sample.domain/ontologies/core#name": ["plain"],
                "shortKey": [{"@id": "_:b5"}]
            }]
        }));
        let before = graph.clone();
        graph.inline_refs();
        assert_eq!(graph, before);
    }

    #[test]
    fn unresolved_reference_keeps_placeholder() {
        let mut graph = Graph::from(json!({
            "@graph": [{
                "@id": "http://sample.domain/api/meta/b35fc8ee-1f65-4884-afc4-593e5fa0aa47",
                "http://sample.domain/ontologies/core#thing": [{"@id": "_:b9"}]
            }]
        }));
        graph.inline_refs();
        assert_eq!(
            graph.subject()["http://sample.domain/ontologies/core#thing"],
            json!([{"@id": "_:b9"}])
        );
    }

    #[test]
    fn references_resolve_from_a_separate_source() {
        let mut view = Graph::from(json!({
            "@graph": [{
                "@id": "http://sample.domain/api/meta/b35fc8ee-1f65-4884-afc4-593e5fa0aa47",
                "http://sample.domain/ontologies/display#collections": [{"@id": "_:b5"}]
            }]
        }));
        let source = scenario_with_collection();
        view.inline_refs_from(&source);
        assert_eq!(
            view.subject()["http://sample.domain/ontologies/display#collections"][0]["@id"],
            json!("_:b5")
        );
        assert!(
            view.subject()["http://sample.domain/ontologies/display#collections"][0]
                .get("http://sample.domain/ontologies/core#element")
                .is_some()
        );
    }
}
