// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Structured logging via `tracing`/`tracing-subscriber`, initialized once
//! from `main` before any stage runs. Every stage logs through the
//! `tracing` macros rather than `println!`, so a run's log stream and its
//! final JSON [`crate::application::report::StageReport`] stay
//! independent: the former is for operators watching a live run, the
//! latter is the durable per-run artifact.

use archival_pipeline_bootstrap::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. `verbose` maps to
/// `LogLevel::Debug` regardless of `base_level`, matching the CLI's
/// `-v/--verbose` flag (§6.5).
pub fn init(base_level: LogLevel, verbose: bool) {
    let level = if verbose { LogLevel::Debug } else { base_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string().to_lowercase()));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_level(true).init();
}
