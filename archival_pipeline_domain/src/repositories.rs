// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # QuadSink port
//!
//! The one persistence-shaped port this domain needs: somewhere to send
//! accumulated quads. `StructureBuilder`, `MetadataOrchestrator`, and
//! `GraphEnricher` all write through it rather than depending on a
//! concrete file-or-HTTP choice; the infrastructure layer provides a
//! file-backed sink (N-Quads files on disk) and `NQuadsLoader` wraps the
//! triple-store client for the load stage proper.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::rdf::quad::Quad;

/// Accepts quads produced by a generator component. Implementations
/// decide whether that means appending to an in-memory buffer, streaming
/// to a file, or both (§4.7: "All generated triples are also appended to
/// an in-memory N-Quads buffer which is always written to a timestamped
/// file, even in dry-run").
#[async_trait]
pub trait QuadSink: Send + Sync {
    async fn write_quads(&self, quads: &[Quad]) -> Result<(), PipelineError>;
}
