// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # RDF Data Model
//!
//! A minimal, hand-rolled RDF 1.1 term and N-Quads model. The pipeline does
//! not need a general-purpose RDF toolkit (parsing arbitrary Turtle, SPARQL
//! algebra, a query engine): it only ever *constructs* quads describing
//! archival entities and serializes them as N-Quads for bulk load over HTTP
//! (§6.1, §6.4). A small, dependency-free model keeps that contract explicit
//! and auditable; see `DESIGN.md` for why `oxrdf`/`oxrdfio` were passed over.
//!
//! - [`term`] — `Iri`, `Literal`, and the `Term`/`GraphName` sum types.
//! - [`quad`] — the `Quad` struct (subject, predicate, object, graph).
//! - [`nquads`] — N-Quads serialization, percent-encoding, and file chunking.
//! - [`prefixes`] — ontology namespace constants (RiC-O, PREMIS, PROV,
//!   Dublin Core Terms, OWL, and the pipeline's own "bodi" vocabulary).

pub mod nquads;
pub mod prefixes;
pub mod quad;
pub mod term;

pub use nquads::{write_nquads, NQuadsWriter};
pub use quad::Quad;
pub use term::{GraphName, Literal, Term};
