// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # MetadataOrchestrator (§4.6)
//!
//! Drives the three [`MetadataExtractor`] adapters (DROID-like format
//! identifier, Tika-like content extractor, ExifTool-like media
//! extractor) plus the filesystem's own `st_mtime`/`st_ctime` pseudo-tool,
//! turning each `(tool, field, value)` tuple into a TechnicalMetadata
//! quad set keyed by the owning Instantiation. Processes the batch in
//! fixed-size chunks (§4.6 "fixed-size chunks, default 100-200"),
//! checkpointing progress after every chunk rather than handing the whole
//! medium to a single extractor invocation. Grounded on the teacher's
//! `application/services` worker-pool dispatch pattern, generalized from
//! chunk compression workers to per-path extractor batches.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use archival_pipeline_domain::entities::technical_metadata::{ExtractorKind, TechnicalMetadata};
use archival_pipeline_domain::rdf::prefixes::*;
use archival_pipeline_domain::rdf::quad::Quad;
use archival_pipeline_domain::rdf::term::{GraphName, Iri, Literal};
use archival_pipeline_domain::services::metadata_extractor::MetadataExtractor;
use archival_pipeline_domain::value_objects::archival_id::ArchivalId;
use archival_pipeline_domain::value_objects::graph_iri::IriFactory;
use archival_pipeline_domain::value_objects::medium::Medium;

use crate::application::report::StageReport;

/// Default chunk size the batch is split into before each extractor
/// invocation (§4.6 "fixed-size chunks, default 100-200").
pub const DEFAULT_FLUSH_EVERY: usize = 150;

/// Runs one extractor over every `(id, path)` pair, chunking `batch` into
/// groups of `chunk_size` files (§4.6) and recording per-path extraction
/// failures without aborting the run (§7 "Extractor" error kind). Every
/// returned field becomes a TechnicalMetadata quad plus a lazily-created
/// TechnicalMetadataType quad (created once per distinct `(tool, field)`
/// pair, keyed by `seen_types`, across the whole batch). Every
/// `(field, value)` pair is also appended to `fields_by_owner` so later
/// passes (AI technical description generation, §4.11) can look up a
/// node's real extracted metadata instead of inventing an empty list.
pub async fn run_extractor<'a>(
    factory: &IriFactory,
    medium: Medium,
    extractor: &dyn MetadataExtractor,
    batch: &[(&'a ArchivalId, PathBuf)],
    workspace: &Path,
    seen_types: &mut std::collections::HashSet<(ExtractorKind, String)>,
    chunk_size: usize,
    fields_by_owner: &mut HashMap<ArchivalId, Vec<(String, String)>>,
) -> (Vec<Quad>, StageReport) {
    let kind = extractor.kind();
    let mut report = StageReport::new(format!("metadata_orchestrator:{}", kind.tool_label()));
    let mut quads = Vec::new();
    let graph = factory.metadata_graph(kind.graph_prefix(), medium);
    let chunk_size = chunk_size.max(1);

    let mut files = 0u64;
    let mut tuples = 0u64;

    for (chunk_index, chunk) in batch.chunks(chunk_size).enumerate() {
        let paths: Vec<PathBuf> = chunk.iter().map(|(_, p)| p.clone()).collect();
        let results = match extractor.extract(&paths, workspace).await {
            Ok(results) => results,
            Err(err) => {
                report.record_error(format!("{}:chunk{chunk_index}", kind.tool_label()), err.to_string());
                continue;
            }
        };

        let by_path: HashMap<&Path, &ArchivalId> = chunk.iter().map(|(id, p)| (p.as_path(), *id)).collect();
        for result in &results {
            let Some(owner) = by_path.get(result.path.as_path()) else {
                report.record_error(result.path.display().to_string(), "extractor returned an unrequested path".to_string());
                continue;
            };

            for (field, value) in &result.fields {
                let type_key = (kind, field.clone());
                if seen_types.insert(type_key.clone()) {
                    emit_type(factory, &graph, kind, field, &mut quads);
                }
                let tm = TechnicalMetadata::new((*owner).clone(), field.clone(), value.clone(), kind);
                emit_tuple(factory, &graph, &tm, &mut quads);
                fields_by_owner.entry((*owner).clone()).or_default().push((field.clone(), value.clone()));
                tuples += 1;
            }
        }

        files += results.len() as u64;
        tracing::debug!(tool = kind.tool_label(), chunk = chunk_index, files = results.len(), "metadata extraction checkpoint");
    }

    report = report.with_count("files", files).with_count("tuples", tuples);
    if !report.errors.is_empty() && files == 0 {
        report.fail();
    }
    (quads, report)
}

fn emit_type(factory: &IriFactory, graph: &GraphName, kind: ExtractorKind, field: &str, quads: &mut Vec<Quad>) {
    let type_iri = factory.metadata_type(kind.graph_prefix(), field);
    quads.push(Quad::new(type_iri.clone(), Iri::new_unchecked(format!("{RDF}type")), Iri::new_unchecked(format!("{RICO}RecordResource")), graph.clone()));
    quads.push(Quad::new(type_iri, Iri::new_unchecked(RDFS_LABEL), Literal::plain(field), graph.clone()));
}

fn emit_tuple(factory: &IriFactory, graph: &GraphName, tm: &TechnicalMetadata, quads: &mut Vec<Quad>) {
    let instantiation_iri = factory.instantiation(&tm.instantiation);
    let tuple_iri = Iri::new_unchecked(format!("{}_{}_{}", instantiation_iri.as_str(), tm.kind.graph_prefix(), archival_pipeline_domain::rdf::nquads::percent_encode(&tm.field)));

    quads.push(Quad::new(instantiation_iri, Iri::new_unchecked(BODI_HAS_TECHNICAL_METADATA), tuple_iri.clone().into(), graph.clone()));
    quads.push(Quad::new(tuple_iri.clone(), Iri::new_unchecked(RDFS_LABEL), Literal::plain(tm.field.clone()), graph.clone()));
    quads.push(Quad::new(tuple_iri, Iri::new_unchecked(RDF_VALUE), Literal::plain(tm.value.clone()), graph.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use archival_pipeline_domain::services::metadata_extractor::ExtractionResult;
    use async_trait::async_trait;

    struct FakeExtractor;

    #[async_trait]
    impl MetadataExtractor for FakeExtractor {
        fn kind(&self) -> ExtractorKind {
            ExtractorKind::MediaExtractor
        }

        async fn extract(&self, batch: &[PathBuf], _workspace: &Path) -> Result<Vec<ExtractionResult>, archival_pipeline_domain::error::PipelineError> {
            Ok(batch
                .iter()
                .map(|p| {
                    let mut fields = HashMap::new();
                    fields.insert("MIMEType".to_string(), "image/jpeg".to_string());
                    ExtractionResult { path: p.clone(), fields, confidence: None }
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn tuples_and_types_are_emitted_once_per_distinct_field() {
        let factory = IriFactory::new("https://example.org/bodi");
        let id1 = ArchivalId::parse("RS1_RS1_R1").unwrap();
        let id2 = ArchivalId::parse("RS1_RS1_R2").unwrap();
        let batch = vec![(&id1, PathBuf::from("/a.jpg")), (&id2, PathBuf::from("/b.jpg"))];
        let mut seen = std::collections::HashSet::new();
        let mut fields_by_owner = HashMap::new();
        let extractor = FakeExtractor;
        let (quads, report) = run_extractor(&factory, Medium::HardDisk, &extractor, &batch, Path::new("/tmp"), &mut seen, DEFAULT_FLUSH_EVERY, &mut fields_by_owner).await;
        assert_eq!(report.count("tuples"), 2);
        let type_quads = quads.iter().filter(|q| q.object.to_string() == "\"MIMEType\"").count();
        assert_eq!(type_quads, 1, "the TechnicalMetadataType label is only emitted once per distinct field");
        assert_eq!(fields_by_owner.get(&id1).unwrap(), &vec![("MIMEType".to_string(), "image/jpeg".to_string())]);
    }

    #[tokio::test]
    async fn batch_is_split_into_chunks_and_both_chunks_contribute() {
        let factory = IriFactory::new("https://example.org/bodi");
        let ids: Vec<ArchivalId> = (1..=5).map(|n| ArchivalId::parse(&format!("RS1_RS1_R{n}")).unwrap()).collect();
        let batch: Vec<(&ArchivalId, PathBuf)> = ids.iter().map(|id| (id, PathBuf::from(format!("/{}.jpg", id.as_str())))).collect();
        let mut seen = std::collections::HashSet::new();
        let mut fields_by_owner = HashMap::new();
        let extractor = FakeExtractor;
        let (_, report) = run_extractor(&factory, Medium::HardDisk, &extractor, &batch, Path::new("/tmp"), &mut seen, 2, &mut fields_by_owner).await;
        assert_eq!(report.count("files"), 5, "every file across every chunk is accounted for");
        assert_eq!(report.count("tuples"), 5);
    }
}
