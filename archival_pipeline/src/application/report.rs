// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Structured Stage Reports
//!
//! §7: "stages return a structured `{success, counts, errors[]}`; the
//! driver collects them and never propagates exceptions across stages."
//! This module is that structure, shared by every stage in
//! `application::services` and rolled up by `PipelineDriver` into the
//! final per-medium JSON report (§4.9, §6.5).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One error recorded by a stage. Stages never bail out of the whole run
/// on a single bad path/file/query; they push a record here and continue
/// (§7).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageErrorRecord {
    pub subject: String,
    pub message: String,
}

impl StageErrorRecord {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self { subject: subject.into(), message: message.into() }
    }
}

/// The outcome of a single stage run. `success` reflects whether the stage
/// met its own completion criteria (not merely "ran without panicking");
/// `counts` carries stage-specific tallies (files walked, quads loaded,
/// mismatches found, etc.) for the final report and for `PipelineDriver`'s
/// critical/verification distinction (§4.9).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageReport {
    pub stage: String,
    pub success: bool,
    pub counts: BTreeMap<String, u64>,
    pub errors: Vec<StageErrorRecord>,
}

impl StageReport {
    pub fn new(stage: impl Into<String>) -> Self {
        Self { stage: stage.into(), success: true, counts: BTreeMap::new(), errors: Vec::new() }
    }

    pub fn with_count(mut self, key: impl Into<String>, value: u64) -> Self {
        self.counts.insert(key.into(), value);
        self
    }

    pub fn record_error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.errors.push(StageErrorRecord::new(subject, message));
    }

    /// Marks the stage as failed without necessarily clearing prior
    /// partial counts — a loader that uploads 2 of 3 chunks successfully
    /// still reports those 2 in `counts` (§4.4 "partial success is
    /// reported").
    pub fn fail(&mut self) {
        self.success = false;
    }

    pub fn count(&self, key: &str) -> u64 {
        *self.counts.get(key).unwrap_or(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_counts() {
        let report = StageReport::new("hash_worker").with_count("hashed", 48).with_count("errors", 2);
        assert_eq!(report.count("hashed"), 48);
        assert!(report.success);
    }

    #[test]
    fn recording_an_error_does_not_auto_fail() {
        let mut report = StageReport::new("loader");
        report.record_error("chunk-2.nq", "HTTP 503");
        assert!(report.success, "stages decide success explicitly, not via error presence alone");
        assert_eq!(report.errors.len(), 1);
    }
}
