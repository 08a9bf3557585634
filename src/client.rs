//! HTTP collaborators: asset fetch and whole-graph persistence.

use std::future::Future;
use std::time::Duration;

use anyhow::{Result, bail};
use reqwest::header::HeaderValue;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::graph::{Graph, Vocab};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
const APPLICATION_LD_JSON: HeaderValue = HeaderValue::from_static("application/ld+json");

/// Anything that can resolve an identifier to a full representation.
///
/// The seam between the graph model and the network; the supply path in
/// [`Graph::subset_supplied`] is generic over it.
pub trait AssetSource {
    fn fetch(&self, iri: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// Asset and persistence client backed by one shared HTTP connection pool.
#[derive(Clone)]
pub struct AssetClient {
    client: Client,
}

impl AssetClient {
    pub fn new() -> AssetClient {
        AssetClient {
            client: Client::builder()
                .http1_only()
                .user_agent(APP_USER_AGENT)
                .gzip(true)
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap(),
        }
    }

    /// Fetch the resource referenced under the `display#` relation `name`
    /// on the canonical subject.
    pub async fn fetch_related(
        &self,
        graph: &mut Graph,
        vocab: &Vocab,
        name: &str,
    ) -> Result<Value> {
        let key = vocab.display(name);
        let iri = graph
            .subject_mut()
            .get(&key)
            .and_then(|value| value.get(0))
            .and_then(|first| first.get("@id"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let Some(iri) = iri else {
            bail!("subject has no {name} reference to fetch");
        };
        self.fetch(&iri).await
    }

    /// Replace the persisted resource behind the canonical subject's
    /// identifier with the serialized container. Idempotent full-state
    /// overwrite; there is no partial update.
    pub async fn save(&self, graph: &mut Graph) -> Result<()> {
        let url = graph
            .subject_mut()
            .get("@id")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let Some(url) = url else {
            bail!("graph subject has no @id to save to");
        };
        let body = json!({"@graph": graph.nodes()});
        let response = self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, APPLICATION_LD_JSON)
            .json(&body)
            .send()
            .await?;
        if response.error_for_status_ref().is_err() {
            let code = response.status();
            let text = response.text().await?;
            bail!("saving {url} failed with error {code} {text}");
        }
        Ok(())
    }
}

impl AssetSource for AssetClient {
    async fn fetch(&self, iri: &str) -> Result<Value> {
        let response = self
            .client
            .get(iri)
            .header(header::ACCEPT, APPLICATION_LD_JSON)
            .send()
            .await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::config::GraphConfig;
    use crate::graph::{Graph, Vocab};

    use super::AssetClient;

    #[tokio::test]
    async fn fetch_related_needs_a_reference() {
        let vocab = Vocab::new(&GraphConfig::default());
        let mut graph = Graph::from(json!({"@graph": [{"@id": "_:b0"}]}));
        let error = AssetClient::new()
            .fetch_related(&mut graph, &vocab, "MenuCatalogue")
            .await
            .unwrap_err();
        assert!(error.to_string().contains("MenuCatalogue"));
    }

    #[tokio::test]
    async fn save_needs_a_subject_id() {
        let mut graph = Graph::from(json!({"@graph": [{"name": "anonymous"}]}));
        let error = AssetClient::new().save(&mut graph).await.unwrap_err();
        assert!(error.to_string().contains("no @id"));
    }
}
