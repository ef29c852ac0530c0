// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Layer
//!
//! Use-case orchestration: the per-stage services (§4) and the
//! structured [`report::StageReport`] contract they all return through
//! (§7), sequenced end to end by
//! [`services::pipeline_driver::DriverState`].

pub mod report;
pub mod services;
