// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # PipelineDriver (§2, §4.9, §7)
//!
//! Sequences the stages in the order §2 fixes: FSWalker, HashWorker,
//! StructureBuilder, NQuadsLoader, IntegrityChecker, MetadataOrchestrator,
//! GraphEnricher, Validator. Collects every stage's [`StageReport`]
//! without ever propagating a stage's internal error as an exception; the
//! *driver* only fails the run outright when a stage is marked
//! "critical" and that stage reports failure — the verification stages
//! (MetadataOrchestrator's per-extractor sub-runs, Validator) never abort
//! the run by themselves (§4.9: "critical/verification distinction").
//! Grounded on the teacher's `application/commands.rs` +
//! `use_cases`-dispatch shape, generalized from a single-file pipeline
//! invocation to a fixed multi-stage sequence over one medium.

use serde::{Deserialize, Serialize};

use crate::application::report::StageReport;

/// Whether a stage's failure aborts the whole run (`Critical`) or is
/// merely recorded for the final report while the run continues
/// (`Verification`) — §4.9's distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageCriticality {
    Critical,
    Verification,
}

/// The fixed stage order and criticality for one medium's full run
/// (§2, §4.9). FSWalker through NQuadsLoader are critical — if the walk
/// can't proceed, there is no data to check; IntegrityChecker's
/// hash-corruption finding is also critical (exit code 2). Everything
/// from MetadataOrchestrator onward is "verification": a failed
/// extractor run or an unhealthy validation query is reported, not fatal.
pub const STAGE_PLAN: &[(&str, StageCriticality)] = &[
    ("fs_walker", StageCriticality::Critical),
    ("hash_worker", StageCriticality::Critical),
    ("structure_builder", StageCriticality::Critical),
    ("nquads_loader", StageCriticality::Critical),
    ("integrity_checker", StageCriticality::Critical),
    ("metadata_orchestrator", StageCriticality::Verification),
    ("graph_enricher", StageCriticality::Verification),
    ("validator", StageCriticality::Verification),
];

/// The full per-medium outcome: every stage's report plus the overall
/// verdict. `overall_success` is `false` if any *critical* stage failed;
/// a failed verification stage still leaves `overall_success` true but is
/// visible in `reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub medium: String,
    pub reports: Vec<StageReport>,
    pub overall_success: bool,
}

/// Accumulates stage reports as the driver runs each stage in turn,
/// deciding whether a critical-stage failure should halt the remaining
/// stages.
#[derive(Debug, Default)]
pub struct DriverState {
    reports: Vec<StageReport>,
    halted: bool,
    verification_failed: bool,
}

impl DriverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `report`. A failed critical stage halts the remaining
    /// stages ([`DriverState::should_continue`] then returns `false`); a
    /// failed verification stage never halts the run but still marks it
    /// failed overall once [`DriverState::finish`] is called (§4.9:
    /// "failure of any critical or verification stage marks the run as
    /// failed").
    pub fn record(&mut self, report: StageReport) {
        let criticality = STAGE_PLAN.iter().find(|(name, _)| *name == report.stage).map(|(_, c)| *c).unwrap_or(StageCriticality::Verification);
        if !report.success {
            match criticality {
                StageCriticality::Critical => self.halted = true,
                StageCriticality::Verification => self.verification_failed = true,
            }
        }
        self.reports.push(report);
    }

    pub fn should_continue(&self) -> bool {
        !self.halted
    }

    pub fn finish(self, medium: impl Into<String>) -> RunReport {
        let overall_success = !self.halted && !self.verification_failed;
        RunReport { medium: medium.into(), reports: self.reports, overall_success }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_failed_critical_stage_halts_subsequent_stages() {
        let mut state = DriverState::new();
        state.record(StageReport::new("fs_walker"));
        let mut failing = StageReport::new("hash_worker");
        failing.fail();
        state.record(failing);
        assert!(!state.should_continue());
        let report = state.finish("hd");
        assert!(!report.overall_success);
    }

    #[test]
    fn a_failed_verification_stage_does_not_halt_but_still_fails_the_run() {
        let mut state = DriverState::new();
        let mut failing = StageReport::new("validator");
        failing.fail();
        state.record(failing);
        assert!(state.should_continue(), "verification-stage failures don't abort remaining stages");
        let report = state.finish("hd");
        assert!(!report.overall_success, "a failed verification stage still marks the run as failed (§4.9)");
    }
}
