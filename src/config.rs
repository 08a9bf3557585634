use serde::Deserialize;

/// Endpoint and namespace roots for one graph-backed API.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Domain root, e.g. `https://example.com`.
    pub base_url: String,
    /// API path root, e.g. `/api`.
    pub api_root: String,
    /// Ontology namespace root, e.g. `https://example.com/ontologies/`.
    pub ontology_base: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.com".to_string(),
            api_root: "/api".to_string(),
            ontology_base: "https://example.com/ontologies/".to_string(),
        }
    }
}

impl GraphConfig {
    /// Normalize any URL fragment to a full `{base_url}{api_root}` URL.
    /// Already-absolute input passes through unchanged.
    pub fn absolute_url(&self, tail: &str) -> String {
        if tail.starts_with("http") {
            return tail.to_owned();
        }
        if tail.starts_with(&self.api_root) {
            return format!("{}{}", self.base_url, tail);
        }
        format!("{}{}{}", self.base_url, self.api_root, tail)
    }

    /// Normalize any URL fragment to a domain-relative `{api_root}` path.
    pub fn api_path(&self, tail: &str) -> String {
        if tail.starts_with("http") {
            return tail.replacen(&self.base_url, "", 1);
        }
        if tail.starts_with(&self.api_root) {
            return tail.to_owned();
        }
        format!("{}{}", self.api_root, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::GraphConfig;

    fn config() -> GraphConfig {
        GraphConfig {
            base_url: "http://sample.domain".to_string(),
            api_root: "/api/v1".to_string(),
            ..GraphConfig::default()
        }
    }

    #[test]
    fn absolute_url_normalizes_every_fragment_form() {
        let config = config();
        assert_eq!(
            config.absolute_url("/method"),
            "http://sample.domain/api/v1/method"
        );
        assert_eq!(
            config.absolute_url("/api/v1/method"),
            "http://sample.domain/api/v1/method"
        );
        assert_eq!(
            config.absolute_url("http://sample.domain/api/v1/method"),
            "http://sample.domain/api/v1/method"
        );
    }

    #[test]
    fn api_path_normalizes_every_fragment_form() {
        let config = config();
        assert_eq!(config.api_path("/method"), "/api/v1/method");
        assert_eq!(config.api_path("/api/v1/method"), "/api/v1/method");
        assert_eq!(
            config.api_path("http://sample.domain/api/v1/method"),
            "/api/v1/method"
        );
    }
}
