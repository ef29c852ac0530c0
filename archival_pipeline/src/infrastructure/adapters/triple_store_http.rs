// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! HTTP adapter for [`TripleStoreClient`] (§6.1): a SPARQL 1.1 Graph
//! Store/Query Protocol client built on `reqwest`, the teacher's HTTP
//! client of choice for its own external-service adapters.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::services::triple_store_client::{SparqlResults, TripleStoreClient};

/// Talks to a SPARQL-1.1-over-HTTP triple store using the same
/// request shape Blazegraph-family stores expose: `GET /namespace/<ns>`
/// for existence, `POST /namespace` to create, `POST /namespace/<ns>`
/// with `Content-Type: application/n-quads` to bulk-load, and
/// `POST /namespace/<ns>/sparql` with a `query`/`update` form field for
/// SPARQL operations (§6.1).
pub struct HttpTripleStoreClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTripleStoreClient {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|err| PipelineError::invalid_config(err.to_string()))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    fn namespace_url(&self, namespace: &str) -> String {
        format!("{}/namespace/{namespace}", self.base_url)
    }

    fn sparql_url(&self, namespace: &str) -> String {
        format!("{}/sparql", self.namespace_url(namespace))
    }
}

#[async_trait]
impl TripleStoreClient for HttpTripleStoreClient {
    async fn namespace_exists(&self, namespace: &str) -> Result<bool, PipelineError> {
        let response = self.client.get(self.namespace_url(namespace)).send().await.map_err(|err| PipelineError::loader_error(err.to_string()))?;
        Ok(response.status().is_success())
    }

    async fn create_namespace(&self, namespace: &str) -> Result<(), PipelineError> {
        let body = format!("com.bigdata.rdf.sail.truthMaintenance=false\ncom.bigdata.rdf.store.AbstractTripleStore.quads=true\ncom.bigdata.rdf.sail.namespace={namespace}\n");
        let response = self
            .client
            .post(format!("{}/namespace", self.base_url))
            .header("Content-Type", "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|err| PipelineError::loader_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::loader_error(format!("create namespace {namespace}: HTTP {}", response.status())));
        }
        Ok(())
    }

    async fn load_nquads(&self, namespace: &str, nquads: &[u8]) -> Result<usize, PipelineError> {
        let body_len = nquads.len();
        let response = self
            .client
            .post(self.namespace_url(namespace))
            .header("Content-Type", "application/n-quads")
            .body(nquads.to_vec())
            .send()
            .await
            .map_err(|err| PipelineError::loader_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::loader_error(format!("load into {namespace}: HTTP {}", response.status())));
        }
        Ok(body_len)
    }

    async fn select(&self, namespace: &str, query: &str) -> Result<SparqlResults, PipelineError> {
        let response = self
            .client
            .post(self.sparql_url(namespace))
            .header("Accept", "application/sparql-results+json")
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|err| PipelineError::sparql_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::sparql_error(format!("SELECT against {namespace}: HTTP {}", response.status())));
        }
        let json: JsonValue = response.json().await.map_err(|err| PipelineError::sparql_error(err.to_string()))?;
        parse_select_results(&json)
    }

    async fn ask(&self, namespace: &str, query: &str) -> Result<bool, PipelineError> {
        let response = self
            .client
            .post(self.sparql_url(namespace))
            .header("Accept", "application/sparql-results+json")
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|err| PipelineError::sparql_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::sparql_error(format!("ASK against {namespace}: HTTP {}", response.status())));
        }
        let json: JsonValue = response.json().await.map_err(|err| PipelineError::sparql_error(err.to_string()))?;
        json.get("boolean").and_then(JsonValue::as_bool).ok_or_else(|| PipelineError::sparql_error("ASK response missing 'boolean' field"))
    }

    async fn update(&self, namespace: &str, update: &str) -> Result<(), PipelineError> {
        let response = self
            .client
            .post(self.sparql_url(namespace))
            .form(&[("update", update)])
            .send()
            .await
            .map_err(|err| PipelineError::sparql_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::sparql_error(format!("UPDATE against {namespace}: HTTP {}", response.status())));
        }
        Ok(())
    }

    async fn construct(&self, namespace: &str, query: &str) -> Result<String, PipelineError> {
        let response = self
            .client
            .post(self.sparql_url(namespace))
            .header("Accept", "application/n-quads")
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|err| PipelineError::sparql_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::sparql_error(format!("CONSTRUCT against {namespace}: HTTP {}", response.status())));
        }
        response.text().await.map_err(|err| PipelineError::sparql_error(err.to_string()))
    }

    async fn select_csv(&self, namespace: &str, query: &str) -> Result<String, PipelineError> {
        let response = self
            .client
            .post(self.sparql_url(namespace))
            .header("Accept", "text/csv")
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|err| PipelineError::sparql_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::sparql_error(format!("SELECT (CSV) against {namespace}: HTTP {}", response.status())));
        }
        response.text().await.map_err(|err| PipelineError::sparql_error(err.to_string()))
    }
}

fn parse_select_results(json: &JsonValue) -> Result<SparqlResults, PipelineError> {
    let variables = json
        .get("head")
        .and_then(|h| h.get("vars"))
        .and_then(JsonValue::as_array)
        .map(|vars| vars.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    let bindings = json
        .get("results")
        .and_then(|r| r.get("bindings"))
        .and_then(JsonValue::as_array)
        .cloned()
        .ok_or_else(|| PipelineError::sparql_error("SELECT response missing results.bindings"))?;
    Ok(SparqlResults { variables, bindings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_select_results() {
        let json = serde_json::json!({
            "head": {"vars": ["s", "count"]},
            "results": {"bindings": [{"count": {"type": "literal", "value": "42"}}]}
        });
        let results = parse_select_results(&json).unwrap();
        assert_eq!(results.variables, vec!["s", "count"]);
        assert_eq!(results.row_count(), 1);
    }

    #[test]
    fn missing_bindings_is_an_error() {
        let json = serde_json::json!({"head": {"vars": []}});
        assert!(parse_select_results(&json).is_err());
    }

    #[test]
    fn base_url_strips_trailing_slashes() {
        let client = HttpTripleStoreClient::new("http://localhost:9999/", std::time::Duration::from_secs(30)).unwrap();
        assert_eq!(client.namespace_url("archive"), "http://localhost:9999/namespace/archive");
    }
}
