// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Archival Pipeline
//!
//! A multi-stage batch pipeline that walks a filesystem hierarchy across
//! three storage media, computes SHA-256 fixity, assembles a RiC-O/PREMIS
//! knowledge graph, bulk-loads it into a SPARQL triple store, and enriches
//! and validates the result. See `archival_pipeline_domain` for the pure
//! entity/value-object/port model this crate builds on.
//!
//! ## Architecture
//!
//! Clean Architecture, the same three-layer split the domain crate and
//! the bootstrap crate assume:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │     presentation (CLI dispatch)              │
//! └───────────────────┬───────────────────────────┘
//! ┌───────────────────┴───────────────────────────┐
//! │     application (per-stage services,          │
//! │     PipelineDriver, StageReport)               │
//! └───────────────────┬───────────────────────────┘
//! ┌───────────────────┴───────────────────────────┐
//! │     infrastructure (triple-store HTTP client,  │
//! │     extractor subprocess/REST adapters,        │
//! │     layered config, tracing)                   │
//! └───────────────────┬───────────────────────────┘
//! ┌───────────────────┴───────────────────────────┐
//! │     archival_pipeline_domain                  │
//! │     (entities, value objects, RDF model,       │
//! │     service ports)                             │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! `archival_pipeline_bootstrap` sits outside all of the above: it parses
//! and security-validates the CLI, then hands a [`presentation::run`] call
//! its validated command.

pub mod application;
pub mod infrastructure;
pub mod presentation;

// Re-export domain types every stage's application code reaches for.
pub use archival_pipeline_domain::{
    error::PipelineError,
    value_objects::{archival_id::ArchivalId, medium::Medium},
};
