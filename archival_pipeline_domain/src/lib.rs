// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Archival Pipeline — Domain Layer
//!
//! Pure, infrastructure-free domain types for the archival ingest
//! pipeline: the RiC-O-flavored entity model (§3), deterministic archival
//! identifiers and other validated value objects (§4.1, §6.6), the
//! hand-rolled RDF term/quad/N-Quads model (§6.4), and the service ports
//! (§6) the application layer's infrastructure adapters implement.
//!
//! Following the teacher's layering: this crate never depends on `tokio`
//! runtime machinery, HTTP clients, or subprocess spawning directly — only
//! `async-trait` for the port *signatures*, which infrastructure fulfills.

pub mod entities;
pub mod error;
pub mod rdf;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::PipelineError;
