// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The archival ontology entities from §3's data model table.

pub mod archival_node;
pub mod date_entity;
pub mod hash_activity;
pub mod instantiation;
pub mod software;
pub mod storage;
pub mod technical_description;
pub mod technical_metadata;
pub mod work;

pub use archival_node::{ArchivalNode, Identifier, NodeVariant};
pub use date_entity::DateEntity;
pub use hash_activity::{HashActivity, HashAlgorithm};
pub use instantiation::{Fixity, Instantiation, Location};
pub use software::{Activity, Software};
pub use storage::{StorageLocation, StorageMedium};
pub use technical_description::TechnicalDescription;
pub use technical_metadata::{ExtractorKind, TechnicalMetadata, TechnicalMetadataType, TechnicalMetadataTypeSet};
pub use work::{Work, WorkAssignment};
