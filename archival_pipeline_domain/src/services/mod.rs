// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain service ports (§6): traits only. Concrete adapters — the HTTP
//! triple-store client, the subprocess/REST/CLI extractors, the LLM
//! client — live in `archival-pipeline`'s infrastructure layer, following
//! the teacher's "domain defines the port, infrastructure implements it"
//! split (see `checksum_service.rs`'s architecture note in the teacher).

pub mod metadata_extractor;
pub mod text_generator;
pub mod triple_store_client;

pub use metadata_extractor::{ExtractionResult, MetadataExtractor};
pub use text_generator::{GenerationOptions, TextGenerator};
pub use triple_store_client::{SparqlResults, TripleStoreClient};
