// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # NQuadsLoader (§4.4)
//!
//! Splits a quad set into chunks that stay under a configured byte
//! threshold — never mid-line, so each chunk is itself a well-formed
//! N-Quads document — and bulk-loads each chunk into the triple store via
//! [`TripleStoreClient::load_nquads`], creating the target namespace first
//! if it doesn't exist. Each chunk is rendered to an in-memory N-Quads
//! body and POSTed directly; nothing is staged to disk (see `DESIGN.md`'s
//! resolved Open Question on N-Quads chunk retention). Grounded on the
//! teacher's `application/services/file_processor.rs` chunked-upload loop,
//! generalized from local chunk processing to chunked HTTP bulk-load.

use std::sync::Arc;

use archival_pipeline_domain::rdf::nquads::write_nquads;
use archival_pipeline_domain::rdf::quad::Quad;
use archival_pipeline_domain::services::triple_store_client::TripleStoreClient;

use crate::application::report::StageReport;

/// Default byte threshold above which an N-Quads body is split into
/// chunks (§4.4: "If an input file exceeds a configured threshold
/// (default 500 MiB)...").
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 500 * 1024 * 1024;

/// One chunk's outcome, kept so callers can identify exactly which chunk
/// files are safe to delete once the whole load is confirmed.
#[derive(Debug, Clone)]
pub struct ChunkOutcome {
    pub chunk_index: usize,
    pub quad_count: usize,
    pub bytes_accepted: Option<usize>,
    pub error: Option<String>,
}

/// Splits `quads` into line-preserving chunks so that each rendered chunk
/// body stays under `max_bytes` (§4.4, edge case: "a 1.5 GiB N-Quads file
/// with a 500 MiB threshold produces three chunks, each under the
/// threshold, whose line concatenation equals the original"). A single
/// quad whose own line exceeds `max_bytes` still gets its own chunk
/// rather than being dropped or split mid-line.
///
/// Chunking is greedy and preserves input order, so `quads.chunks(..)`
/// concatenated back together reconstructs the original sequence.
pub fn chunk_by_byte_threshold(quads: &[Quad], max_bytes: usize) -> Vec<&[Quad]> {
    let max_bytes = max_bytes.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut current_bytes = 0usize;

    for (i, quad) in quads.iter().enumerate() {
        let line_bytes = quad.to_string().len() + 1; // + '\n'
        if current_bytes > 0 && current_bytes + line_bytes > max_bytes {
            chunks.push(&quads[start..i]);
            start = i;
            current_bytes = 0;
        }
        current_bytes += line_bytes;
    }
    if start < quads.len() {
        chunks.push(&quads[start..]);
    }
    chunks
}

/// Loads `quads` into `namespace` in byte-bounded chunks, creating the
/// namespace first if `namespace_exists` reports it missing (§4.4).
///
/// A chunk failure does not abort the remaining chunks (§4.4 "partial
/// success is reported"); the stage is marked failed overall if any chunk
/// failed, but every chunk that can load still does.
pub async fn load(
    client: &Arc<dyn TripleStoreClient>,
    namespace: &str,
    quads: &[Quad],
    max_chunk_bytes: usize,
) -> (Vec<ChunkOutcome>, StageReport) {
    let mut report = StageReport::new("nquads_loader");

    match client.namespace_exists(namespace).await {
        Ok(false) => {
            if let Err(err) = client.create_namespace(namespace).await {
                report.record_error(namespace, err.to_string());
                report.fail();
                return (Vec::new(), report);
            }
        }
        Ok(true) => {}
        Err(err) => {
            report.record_error(namespace, err.to_string());
            report.fail();
            return (Vec::new(), report);
        }
    }

    let mut outcomes = Vec::new();
    let mut loaded_quads = 0u64;

    for (chunk_index, chunk) in chunk_by_byte_threshold(quads, max_chunk_bytes).into_iter().enumerate() {
        let body = write_nquads(chunk);
        match client.load_nquads(namespace, body.as_bytes()).await {
            Ok(bytes_accepted) => {
                loaded_quads += chunk.len() as u64;
                outcomes.push(ChunkOutcome { chunk_index, quad_count: chunk.len(), bytes_accepted: Some(bytes_accepted), error: None });
            }
            Err(err) => {
                report.record_error(format!("chunk-{chunk_index}"), err.to_string());
                outcomes.push(ChunkOutcome { chunk_index, quad_count: chunk.len(), bytes_accepted: None, error: Some(err.to_string()) });
            }
        }
    }

    report = report.with_count("quads_loaded", loaded_quads).with_count("quads_total", quads.len() as u64).with_count("chunks", outcomes.len() as u64);
    if !report.errors.is_empty() {
        report.fail();
    }
    (outcomes, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archival_pipeline_domain::rdf::term::{GraphName, Iri, Literal};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        existing_namespaces: Mutex<Vec<String>>,
        fail_on_chunk: Option<usize>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl TripleStoreClient for FakeStore {
        async fn namespace_exists(&self, namespace: &str) -> Result<bool, archival_pipeline_domain::error::PipelineError> {
            Ok(self.existing_namespaces.lock().unwrap().iter().any(|n| n == namespace))
        }
        async fn create_namespace(&self, namespace: &str) -> Result<(), archival_pipeline_domain::error::PipelineError> {
            self.existing_namespaces.lock().unwrap().push(namespace.to_string());
            Ok(())
        }
        async fn load_nquads(&self, _namespace: &str, nquads: &[u8]) -> Result<usize, archival_pipeline_domain::error::PipelineError> {
            let mut calls = self.calls.lock().unwrap();
            let index = *calls;
            *calls += 1;
            if self.fail_on_chunk == Some(index) {
                return Err(archival_pipeline_domain::error::PipelineError::loader_error("simulated 503"));
            }
            Ok(nquads.len())
        }
        async fn select(&self, _namespace: &str, _query: &str) -> Result<archival_pipeline_domain::services::triple_store_client::SparqlResults, archival_pipeline_domain::error::PipelineError> {
            unimplemented!()
        }
        async fn ask(&self, _namespace: &str, _query: &str) -> Result<bool, archival_pipeline_domain::error::PipelineError> {
            unimplemented!()
        }
        async fn update(&self, _namespace: &str, _update: &str) -> Result<(), archival_pipeline_domain::error::PipelineError> {
            unimplemented!()
        }
        async fn construct(&self, _namespace: &str, _query: &str) -> Result<String, archival_pipeline_domain::error::PipelineError> {
            unimplemented!()
        }
        async fn select_csv(&self, _namespace: &str, _query: &str) -> Result<String, archival_pipeline_domain::error::PipelineError> {
            unimplemented!()
        }
    }

    fn sample_quads(n: usize) -> Vec<Quad> {
        (0..n)
            .map(|i| {
                Quad::new(
                    Iri::new_unchecked(format!("http://example.org/RS1_R{i}")),
                    Iri::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label"),
                    Literal::plain(format!("file{i}")),
                    GraphName(Iri::new_unchecked("http://example.org/structure/RS1")),
                )
            })
            .collect()
    }

    #[test]
    fn chunks_stay_under_the_byte_threshold_and_preserve_order() {
        let quads = sample_quads(50);
        let line_len = quads[0].to_string().len() + 1;
        let max_bytes = line_len * 5; // exactly 5 quads per chunk
        let chunks = chunk_by_byte_threshold(&quads, max_bytes);
        assert_eq!(chunks.len(), 10);
        for chunk in &chunks {
            let body = write_nquads(chunk);
            assert!(body.len() <= max_bytes);
        }
        let reassembled: Vec<Quad> = chunks.into_iter().flatten().cloned().collect();
        assert_eq!(reassembled, quads);
    }

    #[test]
    fn a_threshold_smaller_than_one_line_still_gives_every_quad_its_own_chunk() {
        let quads = sample_quads(3);
        let chunks = chunk_by_byte_threshold(&quads, 1);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() == 1));
    }

    #[tokio::test]
    async fn creates_namespace_when_missing_then_loads_in_byte_bounded_chunks() {
        let store: Arc<dyn TripleStoreClient> = Arc::new(FakeStore::default());
        let quads = sample_quads(12);
        let line_len = quads[0].to_string().len() + 1;
        let (outcomes, report) = load(&store, "archive", &quads, line_len * 5).await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(report.count("quads_loaded"), 12);
        assert!(report.success);
    }

    #[tokio::test]
    async fn a_failing_chunk_does_not_stop_the_remaining_chunks() {
        let store: Arc<dyn TripleStoreClient> = Arc::new(FakeStore { fail_on_chunk: Some(1), ..Default::default() });
        let quads = sample_quads(15);
        let line_len = quads[0].to_string().len() + 1;
        let (outcomes, report) = load(&store, "archive", &quads, line_len * 5).await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(report.count("quads_loaded"), 10);
        assert!(!report.success);
    }

    #[tokio::test]
    async fn an_unbounded_threshold_loads_everything_in_one_chunk() {
        let store: Arc<dyn TripleStoreClient> = Arc::new(FakeStore::default());
        let quads = sample_quads(40);
        let (outcomes, _report) = load(&store, "archive", &quads, DEFAULT_MAX_CHUNK_BYTES).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].quad_count, 40);
    }
}
