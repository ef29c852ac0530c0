// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `TripleStoreClient` port (§6.1): the one collaborator every other
//! stage but FSWalker/HashWorker ultimately talks to. The concrete triple
//! store product is out of scope (§1); the core only ever speaks
//! HTTP + SPARQL 1.1 against this trait.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::PipelineError;

/// A parsed `application/sparql-results+json` SELECT response: the
/// variable names in projection order, plus one binding map per row.
#[derive(Debug, Clone, PartialEq)]
pub struct SparqlResults {
    pub variables: Vec<String>,
    pub bindings: Vec<JsonValue>,
}

impl SparqlResults {
    pub fn row_count(&self) -> usize {
        self.bindings.len()
    }
}

/// Everything the pipeline needs from an RDF triple store exposing a
/// SPARQL 1.1 HTTP endpoint (§6.1).
#[async_trait]
pub trait TripleStoreClient: Send + Sync {
    /// Introspects whether a namespace exists (`GET /namespace`, §6.1).
    async fn namespace_exists(&self, namespace: &str) -> Result<bool, PipelineError>;

    /// Creates a namespace with quads-enabled configuration (§6.1, §4.4).
    async fn create_namespace(&self, namespace: &str) -> Result<(), PipelineError>;

    /// Bulk-loads raw N-Quads bytes into `namespace`
    /// (`POST /namespace/<ns>`, Content-Type `application/n-quads`, §6.1).
    /// Returns the number of bytes accepted by the store.
    async fn load_nquads(&self, namespace: &str, nquads: &[u8]) -> Result<usize, PipelineError>;

    /// Issues a SPARQL 1.1 SELECT/ASK query
    /// (`POST /namespace/<ns>/sparql`, form field `query`, §6.1).
    async fn select(&self, namespace: &str, query: &str) -> Result<SparqlResults, PipelineError>;

    /// Issues a SPARQL 1.1 ASK query, returning the boolean result.
    async fn ask(&self, namespace: &str, query: &str) -> Result<bool, PipelineError>;

    /// Issues a SPARQL 1.1 UPDATE (`form field `update`, §6.1), e.g.
    /// `CLEAR ALL` resets or chunked `INSERT DATA` enrichment passes.
    async fn update(&self, namespace: &str, update: &str) -> Result<(), PipelineError>;

    /// Issues a SPARQL 1.1 CONSTRUCT query, returning the result
    /// serialized as N-Quads (`Accept: application/n-quads`, §6.1) — used
    /// by the driver's pre-run backup.
    async fn construct(&self, namespace: &str, query: &str) -> Result<String, PipelineError>;

    /// Issues a SPARQL 1.1 SELECT query, requesting the store's native
    /// `text/csv` serialization directly (§4.8 "CSV export ... via
    /// `Accept: text/csv`") rather than parsing JSON and re-encoding.
    async fn select_csv(&self, namespace: &str, query: &str) -> Result<String, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparql_results_row_count_matches_bindings() {
        let results = SparqlResults { variables: vec!["s".into()], bindings: vec![JsonValue::Null, JsonValue::Null] };
        assert_eq!(results.row_count(), 2);
    }
}
