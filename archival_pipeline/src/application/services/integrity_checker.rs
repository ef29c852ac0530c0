// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # IntegrityChecker (§4.5)
//!
//! Reconciles what was just loaded against what the graph now reports:
//! a structural count check (expected node/instantiation/fixity counts
//! from the walk vs. `SELECT (COUNT(*)...)` queries against the loaded
//! graph) and a hash-corruption check (recomputed SHA-256 vs. the fixity
//! value the graph stores for the same Instantiation). The count check's
//! only acceptable success criterion is exact structural reconciliation
//! (see `DESIGN.md`'s resolved Open Question); any mismatch is an
//! [`archival_pipeline_domain::error::PipelineError::IntegrityError`], and
//! any hash mismatch is the stronger
//! [`archival_pipeline_domain::error::PipelineError::HashCorruption`],
//! which the bootstrap layer maps to exit code 2 (§7).

use std::sync::Arc;

use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::services::triple_store_client::TripleStoreClient;
use archival_pipeline_domain::value_objects::sha256_hex::hashes_match;

use crate::application::report::StageReport;
use crate::application::services::hash_worker::HashedRecord;

/// The outcome of the structural count check: expected counts (from the
/// in-memory walk/structure-build) vs. observed counts (queried back from
/// the graph after load).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountCheck {
    pub label: String,
    pub expected: u64,
    pub observed: u64,
}

impl CountCheck {
    pub fn matches(&self) -> bool {
        self.expected == self.observed
    }
}

/// Runs the full set of `(label, expected, query)` count checks against
/// `namespace` and reconciles every one. A single mismatch fails the
/// stage; the report lists every check performed, not just the failing
/// one, so operators can see the whole reconciliation at a glance (§4.5).
///
/// `expected` counts and `recomputed` records both trace back to
/// [`crate::application::services::fs_walker::walk`], which already
/// excludes `.DS_Store` at ID-assignment time — this reconciliation never
/// sees it on either side of the comparison, so it needs no exclusion of
/// its own.
pub async fn check_counts(client: &Arc<dyn TripleStoreClient>, namespace: &str, checks: &[(&str, u64, &str)]) -> (Vec<CountCheck>, StageReport) {
    let mut report = StageReport::new("integrity_checker:counts");
    let mut results = Vec::new();

    for (label, expected, query) in checks {
        match client.select(namespace, query).await {
            Ok(results_set) => {
                let observed = extract_count(&results_set.bindings);
                let check = CountCheck { label: label.to_string(), expected: *expected, observed };
                if !check.matches() {
                    report.record_error(*label, format!("expected {} got {}", check.expected, check.observed));
                }
                results.push(check);
            }
            Err(err) => {
                report.record_error(*label, err.to_string());
            }
        }
    }

    report = report.with_count("checks", results.len() as u64).with_count("mismatches", results.iter().filter(|c| !c.matches()).count() as u64);
    if !report.errors.is_empty() {
        report.fail();
    }
    (results, report)
}

fn extract_count(bindings: &[serde_json::Value]) -> u64 {
    bindings
        .first()
        .and_then(|row| row.get("count").or_else(|| row.get("cnt")))
        .and_then(|binding| binding.get("value"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Recomputes fixity for a sample (or all) hashed records and compares
/// against the digest the graph reports for the same Instantiation
/// (§4.5). A mismatch is reported as [`PipelineError::hash_corruption`],
/// never silently tolerated.
pub fn check_hashes(recomputed: &[HashedRecord], graph_digests: &std::collections::HashMap<String, String>) -> (Vec<PipelineError>, StageReport) {
    let mut report = StageReport::new("integrity_checker:hashes");
    let mut corruptions = Vec::new();

    for record in recomputed {
        match graph_digests.get(record.id.as_str()) {
            Some(graph_digest) if hashes_match(graph_digest, record.digest.as_str()) => {}
            Some(graph_digest) => {
                let err = PipelineError::hash_corruption(format!("{}: graph has {graph_digest}, recomputed {}", record.id, record.digest));
                report.record_error(record.id.as_str(), err.to_string());
                corruptions.push(err);
            }
            None => {
                report.record_error(record.id.as_str(), "no fixity recorded in graph");
            }
        }
    }

    report = report.with_count("checked", recomputed.len() as u64).with_count("corruptions", corruptions.len() as u64);
    if !corruptions.is_empty() || !report.errors.is_empty() {
        report.fail();
    }
    (corruptions, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archival_pipeline_domain::value_objects::archival_id::ArchivalId;
    use archival_pipeline_domain::value_objects::sha256_hex::Sha256Hex;
    use std::collections::HashMap;

    #[test]
    fn matching_digest_produces_no_corruption() {
        let id = ArchivalId::parse("RS1_RS1_R1").unwrap();
        let digest = Sha256Hex::of_bytes(b"hello");
        let record = HashedRecord { id: id.clone(), digest: digest.clone(), byte_size: 5 };
        let mut graph = HashMap::new();
        graph.insert(id.as_str().to_string(), digest.as_str().to_uppercase());
        let (corruptions, report) = check_hashes(&[record], &graph);
        assert!(corruptions.is_empty());
        assert!(report.success, "case-insensitive hash match should not fail the stage");
    }

    #[test]
    fn mismatched_digest_is_reported_as_corruption() {
        let id = ArchivalId::parse("RS1_RS1_R1").unwrap();
        let record = HashedRecord { id: id.clone(), digest: Sha256Hex::of_bytes(b"hello"), byte_size: 5 };
        let mut graph = HashMap::new();
        graph.insert(id.as_str().to_string(), Sha256Hex::of_bytes(b"goodbye").as_str().to_string());
        let (corruptions, report) = check_hashes(&[record], &graph);
        assert_eq!(corruptions.len(), 1);
        assert!(!report.success);
        assert!(matches!(corruptions[0], PipelineError::HashCorruption { .. }));
    }

    #[test]
    fn count_check_matches_compares_expected_to_observed() {
        let check = CountCheck { label: "records".into(), expected: 10, observed: 10 };
        assert!(check.matches());
        let mismatch = CountCheck { label: "records".into(), expected: 10, observed: 9 };
        assert!(!mismatch.matches());
    }
}
