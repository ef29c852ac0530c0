// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Presentation Layer
//!
//! The composition root: one handler per [`ValidatedCommand`] variant,
//! wiring the application-layer stages (§4) to their infrastructure
//! adapters (§6) and reporting the result the way every stage already
//! reports internally — a [`StageReport`] printed as JSON, with the
//! process exit code decided by the caller in `main` from the
//! `Result<(), PipelineError>` this module returns.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use archival_pipeline_domain::entities::technical_metadata::ExtractorKind as DomainExtractorKind;
use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::rdf::prefixes::{BODI_HAS_TECHNICAL_METADATA, BODI_REDACTED_INFORMATION, PREMIS_FIXITY, PREMIS_HAS_MESSAGE_DIGEST, RDF_VALUE, RDFS_LABEL, RICO};
use archival_pipeline_domain::rdf::quad::Quad;
use archival_pipeline_domain::rdf::term::GraphName;
use archival_pipeline_domain::repositories::QuadSink;
use archival_pipeline_domain::services::triple_store_client::TripleStoreClient;
use archival_pipeline_domain::value_objects::archival_id::{ArchivalId, NodeKind};
use archival_pipeline_domain::value_objects::graph_iri::IriFactory;
use archival_pipeline_domain::value_objects::medium::Medium as DomainMedium;

use archival_pipeline_bootstrap::cli::parser::{ExtractorKindArg, Medium as CliMedium};
use archival_pipeline_bootstrap::cli::{ValidatedCommand, ValidatedCommonArgs};

use crate::application::report::StageReport;
use crate::application::services::{ai_descriptions, fs_walker, graph_enricher, hash_worker, integrity_checker, metadata_orchestrator, nquads_loader, pipeline_driver, structure_builder, validator, work_linker};
use crate::application::services::pipeline_driver::DriverState;
use crate::infrastructure::adapters::content_extractor::ContentExtractorAdapter;
use crate::infrastructure::adapters::file_quad_sink::FileQuadSink;
use crate::infrastructure::adapters::filesystem_extractor::FileSystemExtractor;
use crate::infrastructure::adapters::format_identifier::FormatIdentifierAdapter;
use crate::infrastructure::adapters::media_extractor::MediaExtractorAdapter;
use crate::infrastructure::adapters::text_generator::HttpTextGenerator;
use crate::infrastructure::adapters::triple_store_http::HttpTripleStoreClient;
use crate::infrastructure::config::PipelineConfig;
use crate::infrastructure::workspace;

/// Dispatches one validated CLI command to its handler.
pub async fn run(command: ValidatedCommand, config: PipelineConfig) -> Result<(), PipelineError> {
    match command {
        ValidatedCommand::Walk { common } => cmd_walk(&config, &common).await,
        ValidatedCommand::Hash { common, resume } => cmd_hash(&config, &common, resume).await,
        ValidatedCommand::BuildStructure { common } => cmd_build_structure(&config, &common).await,
        ValidatedCommand::Load { common, nquads_path } => cmd_load(&config, &common, nquads_path).await,
        ValidatedCommand::CheckIntegrity { common } => cmd_check_integrity(&config, &common).await,
        ValidatedCommand::ExtractMetadata { common, only } => cmd_extract_metadata(&config, &common, only).await,
        ValidatedCommand::Enrich { common, work_spreadsheet, with_ai_descriptions } => cmd_enrich(&config, &common, work_spreadsheet, with_ai_descriptions).await,
        ValidatedCommand::Validate { common, csv_out } => cmd_validate(&config, &common, csv_out).await,
        ValidatedCommand::Run { common, clear_first, work_spreadsheet, with_ai_descriptions, report_path } => {
            cmd_run(&config, &common, clear_first, work_spreadsheet, with_ai_descriptions, report_path).await
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn domain_medium(medium: CliMedium) -> DomainMedium {
    match medium {
        CliMedium::Hd => DomainMedium::HardDisk,
        CliMedium::Hdexternal => DomainMedium::HardDiskExternal,
        CliMedium::Floppy => DomainMedium::Floppy,
    }
}

fn domain_extractor_kind(kind: ExtractorKindArg) -> DomainExtractorKind {
    match kind {
        ExtractorKindArg::FormatIdentifier => DomainExtractorKind::FormatIdentifier,
        ExtractorKindArg::ContentExtractor => DomainExtractorKind::ContentExtractor,
        ExtractorKindArg::MediaExtractor => DomainExtractorKind::MediaExtractor,
    }
}

fn build_triple_store_client(config: &PipelineConfig) -> Result<Arc<dyn TripleStoreClient>, PipelineError> {
    let client = HttpTripleStoreClient::new(config.triple_store.base_url.clone(), Duration::from_secs(config.triple_store.timeout_secs))?;
    Ok(Arc::new(client))
}

/// Writes `quads` to a timestamped N-Quads file under the workspace when
/// `--export-nquads` was given. Independent of `--dry-run`: exporting the
/// generated graph and loading it into the triple store are separate
/// concerns (see [`FileQuadSink`]'s own doc comment).
async fn maybe_export_nquads(config: &PipelineConfig, common: &ValidatedCommonArgs, label: &str, quads: &[Quad]) -> Result<(), PipelineError> {
    if !common.export_nquads {
        return Ok(());
    }
    let sink = FileQuadSink::new(&config.workspace_dir, label, chrono::Utc::now().format("%Y%m%dT%H%M%SZ"))?;
    sink.write_quads(quads).await
}

/// Aggregates sub-stage reports (e.g. `integrity_checker:counts` and
/// `integrity_checker:hashes`, or one `metadata_orchestrator:<tool>` per
/// extractor) into a single report named `stage_name`, so
/// [`DriverState::record`] can match it against [`pipeline_driver::STAGE_PLAN`].
/// Counts are namespaced `"<substage>.<key>"` to avoid collisions; errors
/// are concatenated; the merged report fails if any input did.
fn merge_into(stage_name: &str, reports: Vec<StageReport>) -> StageReport {
    let mut merged = StageReport::new(stage_name);
    for sub in reports {
        for (key, value) in &sub.counts {
            merged = merged.with_count(format!("{}.{key}", sub.stage), *value);
        }
        for error in &sub.errors {
            merged.record_error(error.subject.clone(), error.message.clone());
        }
        if !sub.success {
            merged.fail();
        }
    }
    merged
}

/// Recovers the `ArchivalId` an Instantiation IRI was minted for, by
/// stripping the base's last path segment and the `_inst` suffix
/// [`IriFactory::instantiation`] appends.
fn id_from_instantiation_iri(iri: &str) -> Option<String> {
    iri.rsplit('/').next()?.strip_suffix("_inst").map(|s| s.to_string())
}

/// Queries the structure graph for every Instantiation's recorded fixity
/// digest, keyed by the owning `ArchivalId`'s string form (matching
/// [`crate::application::services::hash_worker::HashedRecord::id`]).
async fn fetch_graph_digests(client: &Arc<dyn TripleStoreClient>, namespace: &str, graph: &GraphName) -> Result<HashMap<String, String>, PipelineError> {
    let query = format!("SELECT ?inst ?digest WHERE {{ GRAPH {graph} {{ ?inst <{PREMIS_FIXITY}> ?fixity . ?fixity <{PREMIS_HAS_MESSAGE_DIGEST}> ?digest }} }}");
    let results = client.select(namespace, &query).await?;
    let mut map = HashMap::new();
    for binding in &results.bindings {
        let inst = binding.get("inst").and_then(|v| v.get("value")).and_then(|v| v.as_str());
        let digest = binding.get("digest").and_then(|v| v.get("value")).and_then(|v| v.as_str());
        if let (Some(inst), Some(digest)) = (inst, digest) {
            if let Some(id) = id_from_instantiation_iri(inst) {
                map.insert(id, digest.to_string());
            }
        }
    }
    Ok(map)
}

/// Queries the structure graph for Instantiations currently flagged
/// `bodi:redactedInformation true` (§3.11), returning the owning
/// `ArchivalId`s as strings. An archivist flips this flag via an
/// out-of-band SPARQL update against the already-loaded graph, so it must
/// always be read back from the triple store rather than trusted from any
/// in-memory state.
async fn fetch_redacted_ids(client: &Arc<dyn TripleStoreClient>, namespace: &str, graph: &GraphName) -> Result<HashSet<String>, PipelineError> {
    let query = format!("SELECT ?inst WHERE {{ GRAPH {graph} {{ ?inst <{BODI_REDACTED_INFORMATION}> true }} }}");
    let results = client.select(namespace, &query).await?;
    let mut ids = HashSet::new();
    for binding in &results.bindings {
        let inst = binding.get("inst").and_then(|v| v.get("value")).and_then(|v| v.as_str());
        if let Some(inst) = inst {
            if let Some(id) = id_from_instantiation_iri(inst) {
                ids.insert(id);
            }
        }
    }
    Ok(ids)
}

/// Queries every extractor's metadata graph for the `(field, value)` pairs
/// already loaded for each Instantiation (§4.6's TechnicalMetadata tuple
/// shape), grouped by owning `ArchivalId` string, for use as AI technical
/// description input (§4.11) when no in-process extraction just ran.
async fn fetch_metadata_fields(client: &Arc<dyn TripleStoreClient>, namespace: &str, factory: &IriFactory, medium: DomainMedium) -> Result<HashMap<String, Vec<(String, String)>>, PipelineError> {
    let mut fields_by_owner: HashMap<String, Vec<(String, String)>> = HashMap::new();
    for prefix in ["DROID", "AT", "ET", "FS"] {
        let graph = factory.metadata_graph(prefix, medium);
        let query = format!(
            "SELECT ?inst ?field ?value WHERE {{ GRAPH {graph} {{ ?inst <{BODI_HAS_TECHNICAL_METADATA}> ?t . ?t <{RDFS_LABEL}> ?field . ?t <{RDF_VALUE}> ?value }} }}"
        );
        let results = client.select(namespace, &query).await?;
        for binding in &results.bindings {
            let inst = binding.get("inst").and_then(|v| v.get("value")).and_then(|v| v.as_str());
            let field = binding.get("field").and_then(|v| v.get("value")).and_then(|v| v.as_str());
            let value = binding.get("value").and_then(|v| v.get("value")).and_then(|v| v.as_str());
            if let (Some(inst), Some(field), Some(value)) = (inst, field, value) {
                if let Some(id) = id_from_instantiation_iri(inst) {
                    fields_by_owner.entry(id).or_default().push((field.to_string(), value.to_string()));
                }
            }
        }
    }
    Ok(fields_by_owner)
}

fn print_report(report: &StageReport) {
    match serde_json::to_string_pretty(report) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::warn!(error = %err, "failed to serialize stage report"),
    }
}

fn finish(report: StageReport) -> Result<(), PipelineError> {
    if report.success {
        Ok(())
    } else {
        Err(PipelineError::internal_error(format!("stage '{}' did not complete successfully", report.stage)))
    }
}

// ---------------------------------------------------------------------------
// Per-stage commands
// ---------------------------------------------------------------------------

async fn cmd_walk(config: &PipelineConfig, common: &ValidatedCommonArgs) -> Result<(), PipelineError> {
    let medium = domain_medium(common.medium);
    let root = common.root.clone().ok_or_else(|| PipelineError::invalid_config("walk requires --root"))?;
    let result = fs_walker::walk(&root, medium);
    workspace::save_walk(&config.workspace_dir, medium, &result.events)?;
    let report = result.into_report();
    print_report(&report);
    finish(report)
}

async fn cmd_hash(config: &PipelineConfig, common: &ValidatedCommonArgs, resume: bool) -> Result<(), PipelineError> {
    let medium = domain_medium(common.medium);
    let walk = workspace::load_walk(&config.workspace_dir, medium)?;

    let existing = if resume && workspace::hashed_checkpoint_exists(&config.workspace_dir, medium) {
        workspace::load_hashed(&config.workspace_dir, medium)?
    } else {
        Vec::new()
    };
    let already_hashed: HashSet<&ArchivalId> = existing.iter().map(|record| &record.id).collect();

    let pending: Vec<(&ArchivalId, &Path)> = walk
        .iter()
        .filter(|event| event.kind == NodeKind::Record && !already_hashed.contains(&event.id))
        .map(|event| (&event.id, event.absolute_path.as_path()))
        .collect();

    let (mut hashed, report) = hash_worker::hash_all(pending);
    hashed.extend(existing);
    workspace::save_hashed(&config.workspace_dir, medium, &hashed)?;

    print_report(&report);
    finish(report)
}

async fn cmd_build_structure(config: &PipelineConfig, common: &ValidatedCommonArgs) -> Result<(), PipelineError> {
    let medium = domain_medium(common.medium);
    let walk = workspace::load_walk(&config.workspace_dir, medium)?;
    let hashed = workspace::load_hashed(&config.workspace_dir, medium)?;
    let factory = IriFactory::new(config.base_iri.clone());

    let (quads, report) = structure_builder::build(&factory, medium, &walk, &hashed, chrono::Utc::now().date_naive());
    maybe_export_nquads(config, common, "structure", &quads).await?;

    print_report(&report);
    finish(report)
}

async fn cmd_load(config: &PipelineConfig, common: &ValidatedCommonArgs, nquads_path: Option<PathBuf>) -> Result<(), PipelineError> {
    let client = build_triple_store_client(config)?;
    let namespace = config.triple_store.namespace.clone();

    let report = if let Some(path) = nquads_path {
        let bytes = std::fs::read(&path)?;
        let mut report = StageReport::new("nquads_loader").with_count("bytes", bytes.len() as u64);
        if !common.dry_run {
            if !client.namespace_exists(&namespace).await? {
                client.create_namespace(&namespace).await?;
            }
            let quad_count = client.load_nquads(&namespace, &bytes).await?;
            report = report.with_count("quads_loaded", quad_count as u64);
        }
        report
    } else {
        let medium = domain_medium(common.medium);
        let walk = workspace::load_walk(&config.workspace_dir, medium)?;
        let hashed = workspace::load_hashed(&config.workspace_dir, medium)?;
        let factory = IriFactory::new(config.base_iri.clone());
        let (quads, _build_report) = structure_builder::build(&factory, medium, &walk, &hashed, chrono::Utc::now().date_naive());
        maybe_export_nquads(config, common, "structure", &quads).await?;

        if common.dry_run {
            StageReport::new("nquads_loader").with_count("quads_total", quads.len() as u64)
        } else {
            let (_, report) = nquads_loader::load(&client, &namespace, &quads, config.throttle.batch_size).await;
            report
        }
    };

    print_report(&report);
    finish(report)
}

async fn cmd_check_integrity(config: &PipelineConfig, common: &ValidatedCommonArgs) -> Result<(), PipelineError> {
    let medium = domain_medium(common.medium);
    let walk = workspace::load_walk(&config.workspace_dir, medium)?;
    let hashed = workspace::load_hashed(&config.workspace_dir, medium)?;
    let client = build_triple_store_client(config)?;
    let namespace = config.triple_store.namespace.clone();
    let factory = IriFactory::new(config.base_iri.clone());
    let graph = factory.structure_graph(&medium.root_id());

    let record_count = walk.iter().filter(|e| e.kind == NodeKind::Record).count() as u64;
    let recordset_count = walk.iter().filter(|e| e.kind == NodeKind::RecordSet).count() as u64;

    let record_query = format!("SELECT (COUNT(?r) AS ?count) WHERE {{ GRAPH {graph} {{ ?r a <{RICO}Record> }} }}");
    let recordset_query = format!("SELECT (COUNT(?r) AS ?count) WHERE {{ GRAPH {graph} {{ ?r a <{RICO}RecordSet> }} }}");
    let checks: Vec<(&str, u64, &str)> = vec![("record_count", record_count, record_query.as_str()), ("recordset_count", recordset_count, recordset_query.as_str())];

    let (_, counts_report) = integrity_checker::check_counts(&client, &namespace, &checks).await;

    let graph_digests = fetch_graph_digests(&client, &namespace, &graph).await?;
    let (corruptions, hashes_report) = integrity_checker::check_hashes(&hashed, &graph_digests);

    let merged = merge_into("integrity_checker", vec![counts_report, hashes_report]);
    print_report(&merged);

    if let Some(first) = corruptions.into_iter().next() {
        return Err(first);
    }
    finish(merged)
}

async fn cmd_extract_metadata(config: &PipelineConfig, common: &ValidatedCommonArgs, only: Option<ExtractorKindArg>) -> Result<(), PipelineError> {
    let medium = domain_medium(common.medium);
    let walk = workspace::load_walk(&config.workspace_dir, medium)?;
    let factory = IriFactory::new(config.base_iri.clone());

    let instantiated: Vec<(&ArchivalId, PathBuf)> = walk
        .iter()
        .filter(|event| event.kind == NodeKind::Record)
        .map(|event| (&event.id, event.absolute_path.clone()))
        .collect();

    let extractors: Vec<Box<dyn archival_pipeline_domain::services::metadata_extractor::MetadataExtractor>> = match only {
        Some(kind_arg) => vec![build_extractor(config, domain_extractor_kind(kind_arg))?],
        None => vec![
            build_extractor(config, DomainExtractorKind::FormatIdentifier)?,
            build_extractor(config, DomainExtractorKind::ContentExtractor)?,
            build_extractor(config, DomainExtractorKind::MediaExtractor)?,
            Box::new(FileSystemExtractor::new()),
        ],
    };

    let mut quads = Vec::new();
    let mut seen_types = HashSet::new();
    let mut sub_reports = Vec::new();
    let mut fields_by_owner = HashMap::new();

    for extractor in &extractors {
        let (mut extractor_quads, report) = metadata_orchestrator::run_extractor(
            &factory,
            medium,
            extractor.as_ref(),
            &instantiated,
            &config.workspace_dir,
            &mut seen_types,
            config.throttle.flush_every,
            &mut fields_by_owner,
        )
        .await;
        quads.append(&mut extractor_quads);
        sub_reports.push(report);
    }

    maybe_export_nquads(config, common, "metadata", &quads).await?;
    if !common.dry_run {
        let client = build_triple_store_client(config)?;
        let namespace = config.triple_store.namespace.clone();
        let (_, load_report) = nquads_loader::load(&client, &namespace, &quads, config.throttle.batch_size).await;
        sub_reports.push(load_report);
    }

    let merged = merge_into("metadata_orchestrator", sub_reports);
    print_report(&merged);
    finish(merged)
}

fn build_extractor(config: &PipelineConfig, kind: DomainExtractorKind) -> Result<Box<dyn archival_pipeline_domain::services::metadata_extractor::MetadataExtractor>, PipelineError> {
    let timeout = Duration::from_secs(config.extractors.timeout_secs);
    match kind {
        DomainExtractorKind::FormatIdentifier => Ok(Box::new(FormatIdentifierAdapter::new(config.extractors.format_identifier_binary.clone(), timeout))),
        DomainExtractorKind::ContentExtractor => Ok(Box::new(ContentExtractorAdapter::new(config.extractors.content_extractor_url.clone(), timeout)?)),
        DomainExtractorKind::MediaExtractor => Ok(Box::new(MediaExtractorAdapter::new(config.extractors.media_extractor_binary.clone(), timeout))),
        DomainExtractorKind::FileSystem => Ok(Box::new(FileSystemExtractor::new())),
    }
}

async fn cmd_enrich(config: &PipelineConfig, common: &ValidatedCommonArgs, work_spreadsheet: Option<PathBuf>, with_ai_descriptions: bool) -> Result<(), PipelineError> {
    let medium = domain_medium(common.medium);
    let walk = workspace::load_walk(&config.workspace_dir, medium)?;
    let hashed = workspace::load_hashed(&config.workspace_dir, medium)?;
    let factory = IriFactory::new(config.base_iri.clone());
    let graph = factory.enrichment_graph();

    let mut quads = Vec::new();
    let mut pass_counts: Vec<(&str, usize)> = Vec::new();

    graph_enricher::bootstrap_type_sets(&factory, &graph, &mut quads);
    pass_counts.push(("type_sets", 20));

    let mut seen_days = HashSet::new();
    let mut title_count = 0usize;
    let mut date_link_count = 0usize;
    for event in &walk {
        if event.id.is_container_root() {
            continue;
        }
        graph_enricher::emit_title(&factory, &graph, &event.id, &fs_walker_label(event), &mut quads);
        title_count += 1;

        if let Ok(system_metadata) = std::fs::metadata(&event.absolute_path) {
            if let Ok(modified) = system_metadata.modified() {
                let modified: chrono::DateTime<chrono::Utc> = modified.into();
                if let Some((entity, fragment)) = graph_enricher::normalize_one(&modified.to_rfc3339(), archival_pipeline_domain::value_objects::normalized_date::DateProvenance::FileSystemMetadata) {
                    graph_enricher::emit_date(&factory, &graph, &entity, &fragment, &mut seen_days, &mut quads);
                    graph_enricher::link_date(&factory, &graph, &event.id, &entity.normalized_date_value(), false, &mut quads);
                    date_link_count += 1;
                }
            }
        }
    }
    pass_counts.push(("titles", title_count));
    pass_counts.push(("dates_linked", date_link_count));

    let digests: Vec<(&ArchivalId, &str)> = hashed.iter().map(|record| (&record.id, record.digest.as_str())).collect();
    let cliques = graph_enricher::duplicate_cliques(digests);
    for clique in &cliques {
        graph_enricher::emit_duplicate_clique(&factory, &graph, clique, &mut quads);
    }
    pass_counts.push(("duplicate_cliques", cliques.len()));

    if let Some(spreadsheet_path) = work_spreadsheet {
        let body = std::fs::read_to_string(&spreadsheet_path)?;
        let (rows, parse_report) = work_linker::parse_csv(&body);
        let children_by_parent = children_by_parent(&walk);
        let assignments = work_linker::propagate(&rows, &children_by_parent);
        for assignment in &assignments {
            work_linker::emit(&factory, &graph, assignment, &mut quads);
        }
        pass_counts.push(("work_rows", parse_report.count("rows") as usize));
        pass_counts.push(("work_assignments", assignments.len()));
    }

    if with_ai_descriptions {
        if !config.ai_descriptions.enabled {
            return Err(PipelineError::invalid_config("AI descriptions requested but not enabled in configuration"));
        }
        let (redacted_ids, fields_by_owner) = if !common.dry_run {
            let client = build_triple_store_client(config)?;
            let namespace = config.triple_store.namespace.clone();
            let structure_graph = factory.structure_graph(&medium.root_id());
            let redacted_ids = fetch_redacted_ids(&client, &namespace, &structure_graph).await?;
            let fields_by_owner = fetch_metadata_fields(&client, &namespace, &factory, medium).await?;
            (redacted_ids, fields_by_owner)
        } else {
            (HashSet::new(), HashMap::new())
        };

        let generator = HttpTextGenerator::new(config.ai_descriptions.base_url.clone(), Duration::from_secs(config.ai_descriptions.timeout_secs))?;
        let generated_on = chrono::Utc::now().date_naive();
        let mut attempted = 0usize;
        let mut succeeded = 0usize;
        let empty = Vec::new();
        for event in walk.iter().filter(|event| event.kind == NodeKind::Record) {
            if redacted_ids.contains(event.id.as_str()) {
                continue;
            }
            attempted += 1;
            let label = fs_walker_label(event);
            let fields = fields_by_owner.get(event.id.as_str()).unwrap_or(&empty);
            match ai_descriptions::generate_one(&factory, &graph, &generator, &config.ai_descriptions.model, &event.id, &label, fields, generated_on).await {
                Ok((mut description_quads, _description)) => {
                    quads.append(&mut description_quads);
                    succeeded += 1;
                }
                Err(err) => {
                    tracing::warn!(id = %event.id, error = %err, "AI description generation failed");
                }
            }
        }
        let ai_report = ai_descriptions::report_for(attempted, succeeded);
        pass_counts.push(("ai_descriptions_attempted", ai_report.count("attempted") as usize));
        pass_counts.push(("ai_descriptions_succeeded", ai_report.count("succeeded") as usize));
    }

    maybe_export_nquads(config, common, "enrichment", &quads).await?;
    if !common.dry_run {
        let client = build_triple_store_client(config)?;
        let namespace = config.triple_store.namespace.clone();
        nquads_loader::load(&client, &namespace, &quads, config.throttle.batch_size).await;
    }

    let report = graph_enricher::report_for(&pass_counts);
    print_report(&report);
    finish(report)
}

fn fs_walker_label(event: &fs_walker::WalkEvent) -> String {
    event.absolute_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| event.relative_path.clone())
}

fn children_by_parent(walk: &[fs_walker::WalkEvent]) -> HashMap<ArchivalId, Vec<ArchivalId>> {
    let mut map: HashMap<ArchivalId, Vec<ArchivalId>> = HashMap::new();
    for event in walk {
        if let Some(parent) = &event.parent {
            map.entry(parent.clone()).or_default().push(event.id.clone());
        }
    }
    map
}

async fn cmd_validate(config: &PipelineConfig, _common: &ValidatedCommonArgs, csv_out: Option<PathBuf>) -> Result<(), PipelineError> {
    let client = build_triple_store_client(config)?;
    let namespace = config.triple_store.namespace.clone();

    let (_, report) = validator::run_battery_with_delays(&client, &namespace, config.throttle.query_delay(), config.throttle.category_delay()).await;
    print_report(&report);

    if let Some(out_dir) = csv_out {
        let csv_report = validator::export_csv(&client, &namespace, &out_dir).await?;
        print_report(&csv_report);
        finish(csv_report)?;
    }

    finish(report)
}

#[allow(clippy::too_many_arguments)]
async fn cmd_run(
    config: &PipelineConfig,
    common: &ValidatedCommonArgs,
    clear_first: bool,
    work_spreadsheet: Option<PathBuf>,
    with_ai_descriptions: bool,
    report_path: Option<PathBuf>,
) -> Result<(), PipelineError> {
    let medium = domain_medium(common.medium);
    let mut driver = DriverState::new();

    if clear_first && !common.dry_run {
        let client = build_triple_store_client(config)?;
        let namespace = config.triple_store.namespace.clone();
        if client.namespace_exists(&namespace).await? {
            client.create_namespace(&namespace).await?;
        }
    }

    let root = common.root.clone().ok_or_else(|| PipelineError::invalid_config("run requires --root"))?;
    let walk_result = fs_walker::walk(&root, medium);
    workspace::save_walk(&config.workspace_dir, medium, &walk_result.events)?;
    let walk = walk_result.events.clone();
    driver.record(walk_result.into_report());
    if !driver.should_continue() {
        return finish_run(driver, medium, report_path);
    }

    let (hashed, hash_report) = {
        let pending: Vec<(&ArchivalId, &Path)> = walk.iter().filter(|event| event.kind == NodeKind::Record).map(|event| (&event.id, event.absolute_path.as_path())).collect();
        hash_worker::hash_all(pending)
    };
    workspace::save_hashed(&config.workspace_dir, medium, &hashed)?;
    driver.record(hash_report);
    if !driver.should_continue() {
        return finish_run(driver, medium, report_path);
    }

    let factory = IriFactory::new(config.base_iri.clone());
    let (structure_quads, structure_report) = structure_builder::build(&factory, medium, &walk, &hashed, chrono::Utc::now().date_naive());
    maybe_export_nquads(config, common, "structure", &structure_quads).await?;
    driver.record(structure_report);
    if !driver.should_continue() {
        return finish_run(driver, medium, report_path);
    }

    let client = build_triple_store_client(config)?;
    let namespace = config.triple_store.namespace.clone();
    if !common.dry_run {
        let (_, load_report) = nquads_loader::load(&client, &namespace, &structure_quads, config.throttle.batch_size).await;
        driver.record(load_report);
    } else {
        driver.record(StageReport::new("nquads_loader").with_count("quads_total", structure_quads.len() as u64));
    }
    if !driver.should_continue() {
        return finish_run(driver, medium, report_path);
    }

    if !common.dry_run {
        let graph = factory.structure_graph(&medium.root_id());
        let record_count = walk.iter().filter(|e| e.kind == NodeKind::Record).count() as u64;
        let recordset_count = walk.iter().filter(|e| e.kind == NodeKind::RecordSet).count() as u64;
        let record_query = format!("SELECT (COUNT(?r) AS ?count) WHERE {{ GRAPH {graph} {{ ?r a <{RICO}Record> }} }}");
        let recordset_query = format!("SELECT (COUNT(?r) AS ?count) WHERE {{ GRAPH {graph} {{ ?r a <{RICO}RecordSet> }} }}");
        let checks: Vec<(&str, u64, &str)> = vec![("record_count", record_count, record_query.as_str()), ("recordset_count", recordset_count, recordset_query.as_str())];
        let (_, counts_report) = integrity_checker::check_counts(&client, &namespace, &checks).await;
        let graph_digests = fetch_graph_digests(&client, &namespace, &graph).await?;
        let (corruptions, hashes_report) = integrity_checker::check_hashes(&hashed, &graph_digests);
        driver.record(merge_into("integrity_checker", vec![counts_report, hashes_report]));
        if let Some(first) = corruptions.into_iter().next() {
            return Err(first);
        }
    } else {
        driver.record(StageReport::new("integrity_checker"));
    }
    if !driver.should_continue() {
        return finish_run(driver, medium, report_path);
    }

    let instantiated: Vec<(&ArchivalId, PathBuf)> = walk.iter().filter(|event| event.kind == NodeKind::Record).map(|event| (&event.id, event.absolute_path.clone())).collect();
    let extractors: Vec<Box<dyn archival_pipeline_domain::services::metadata_extractor::MetadataExtractor>> = vec![
        build_extractor(config, DomainExtractorKind::FormatIdentifier)?,
        build_extractor(config, DomainExtractorKind::ContentExtractor)?,
        build_extractor(config, DomainExtractorKind::MediaExtractor)?,
        Box::new(FileSystemExtractor::new()),
    ];
    let mut metadata_quads = Vec::new();
    let mut seen_types = HashSet::new();
    let mut metadata_sub_reports = Vec::new();
    let mut fields_by_owner = HashMap::new();
    for extractor in &extractors {
        let (mut extractor_quads, report) = metadata_orchestrator::run_extractor(
            &factory,
            medium,
            extractor.as_ref(),
            &instantiated,
            &config.workspace_dir,
            &mut seen_types,
            config.throttle.flush_every,
            &mut fields_by_owner,
        )
        .await;
        metadata_quads.append(&mut extractor_quads);
        metadata_sub_reports.push(report);
    }
    maybe_export_nquads(config, common, "metadata", &metadata_quads).await?;
    if !common.dry_run {
        let (_, load_report) = nquads_loader::load(&client, &namespace, &metadata_quads, config.throttle.batch_size).await;
        metadata_sub_reports.push(load_report);
    }
    driver.record(merge_into("metadata_orchestrator", metadata_sub_reports));
    if !driver.should_continue() {
        return finish_run(driver, medium, report_path);
    }

    let post_metadata_pending: Vec<(&ArchivalId, &Path)> = walk.iter().filter(|event| event.kind == NodeKind::Record).map(|event| (&event.id, event.absolute_path.as_path())).collect();
    let (post_metadata_hashed, post_metadata_hash_report) = hash_worker::hash_all(post_metadata_pending);
    driver.record(post_metadata_hash_report);
    if !driver.should_continue() {
        return finish_run(driver, medium, report_path);
    }
    let post_metadata_digests: HashMap<String, String> = post_metadata_hashed.iter().map(|record| (record.id.as_str().to_string(), record.digest.as_str().to_string())).collect();
    let (consistency_corruptions, consistency_report) = integrity_checker::check_hashes(&hashed, &post_metadata_digests);
    driver.record(merge_into("integrity_checker", vec![consistency_report]));
    if let Some(first) = consistency_corruptions.into_iter().next() {
        return Err(first);
    }
    if !driver.should_continue() {
        return finish_run(driver, medium, report_path);
    }

    let enrichment_graph = factory.enrichment_graph();
    let mut enrichment_quads = Vec::new();
    let mut pass_counts: Vec<(&str, usize)> = Vec::new();
    graph_enricher::bootstrap_type_sets(&factory, &enrichment_graph, &mut enrichment_quads);
    pass_counts.push(("type_sets", 20));

    let mut title_count = 0usize;
    for event in walk.iter().filter(|event| !event.id.is_container_root()) {
        graph_enricher::emit_title(&factory, &enrichment_graph, &event.id, &fs_walker_label(event), &mut enrichment_quads);
        title_count += 1;
    }
    pass_counts.push(("titles", title_count));

    let digests: Vec<(&ArchivalId, &str)> = hashed.iter().map(|record| (&record.id, record.digest.as_str())).collect();
    let cliques = graph_enricher::duplicate_cliques(digests);
    for clique in &cliques {
        graph_enricher::emit_duplicate_clique(&factory, &enrichment_graph, clique, &mut enrichment_quads);
    }
    pass_counts.push(("duplicate_cliques", cliques.len()));

    if let Some(spreadsheet_path) = &work_spreadsheet {
        let body = std::fs::read_to_string(spreadsheet_path)?;
        let (rows, parse_report) = work_linker::parse_csv(&body);
        let children_by_parent = children_by_parent(&walk);
        let assignments = work_linker::propagate(&rows, &children_by_parent);
        for assignment in &assignments {
            work_linker::emit(&factory, &enrichment_graph, assignment, &mut enrichment_quads);
        }
        pass_counts.push(("work_rows", parse_report.count("rows") as usize));
        pass_counts.push(("work_assignments", assignments.len()));
    }

    if with_ai_descriptions && config.ai_descriptions.enabled {
        let redacted_ids = if !common.dry_run {
            let structure_graph = factory.structure_graph(&medium.root_id());
            fetch_redacted_ids(&client, &namespace, &structure_graph).await?
        } else {
            HashSet::new()
        };
        let generator = HttpTextGenerator::new(config.ai_descriptions.base_url.clone(), Duration::from_secs(config.ai_descriptions.timeout_secs))?;
        let generated_on = chrono::Utc::now().date_naive();
        let mut attempted = 0usize;
        let mut succeeded = 0usize;
        for event in walk.iter().filter(|event| event.kind == NodeKind::Record) {
            if redacted_ids.contains(event.id.as_str()) {
                continue;
            }
            attempted += 1;
            let empty = Vec::new();
            let fields = fields_by_owner.get(&event.id).unwrap_or(&empty);
            if let Ok((mut description_quads, _description)) =
                ai_descriptions::generate_one(&factory, &enrichment_graph, &generator, &config.ai_descriptions.model, &event.id, &fs_walker_label(event), fields, generated_on).await
            {
                enrichment_quads.append(&mut description_quads);
                succeeded += 1;
            }
        }
        pass_counts.push(("ai_descriptions_attempted", attempted));
        pass_counts.push(("ai_descriptions_succeeded", succeeded));
    }

    maybe_export_nquads(config, common, "enrichment", &enrichment_quads).await?;
    if !common.dry_run {
        nquads_loader::load(&client, &namespace, &enrichment_quads, config.throttle.batch_size).await;
    }
    driver.record(graph_enricher::report_for(&pass_counts));

    if !common.dry_run {
        let (_, validate_report) = validator::run_battery_with_delays(&client, &namespace, config.throttle.query_delay(), config.throttle.category_delay()).await;
        driver.record(validate_report);
    } else {
        driver.record(StageReport::new("validator"));
    }

    finish_run(driver, medium, report_path)
}

fn finish_run(driver: DriverState, medium: DomainMedium, report_path: Option<PathBuf>) -> Result<(), PipelineError> {
    let run_report = driver.finish(medium.cli_token());
    let overall_success = run_report.overall_success;

    if let Some(path) = &report_path {
        let bytes = serde_json::to_vec_pretty(&run_report)?;
        std::fs::write(path, bytes)?;
    }
    println!("{}", serde_json::to_string_pretty(&run_report).unwrap_or_default());

    if overall_success {
        Ok(())
    } else {
        Err(PipelineError::internal_error(format!("run for medium '{}' did not complete successfully", run_report.medium)))
    }
}
