// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Concrete adapters for the domain's ports (§6) plus the ambient
//! concerns every stage needs regardless of which port it calls:
//! layered [`config`] and `tracing`-based [`logging`].

pub mod adapters;
pub mod config;
pub mod logging;
pub mod workspace;
