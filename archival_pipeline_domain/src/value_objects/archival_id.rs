// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Deterministic, path-derived archival identifiers (§4.1, §8 invariant 1).
//!
//! Unlike the teacher's `PipelineId`/`StageId` (random UUIDs via
//! `GenericId<Marker>`), an `ArchivalId` is never random: it is built by
//! appending a monotone per-parent counter segment to the parent's ID, so
//! two runs over the same tree produce byte-identical IDs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A node kind determines which counter (`RS` for RecordSet/directory, `R`
/// for Record/file) is incremented when a child is assigned an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    RecordSet,
    Record,
}

impl NodeKind {
    fn segment_prefix(self) -> &'static str {
        match self {
            NodeKind::RecordSet => "RS",
            NodeKind::Record => "R",
        }
    }
}

/// A stable, deterministic archival identifier such as `RS1_RS2_R4`.
///
/// The root container is always `RS1` (§3 invariant 9). Every other ID is
/// `<parent>_<RS|R><n>` where `n` is the 1-based ordinal of this child among
/// its same-kind siblings, assigned in the walker's deterministic
/// depth-first, case-insensitive-alphabetic order (§8 invariant 1).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArchivalId(String);

impl ArchivalId {
    /// The well-known container root that logically holds all three media
    /// roots (§3 invariant 9).
    pub const CONTAINER_ROOT: &'static str = "RS1";

    /// The three predefined medium root IDs (§3 invariant 8, §4.3).
    pub const MEDIUM_ROOTS: [&'static str; 3] = ["RS1_RS1", "RS1_RS2", "RS1_RS3"];

    /// Builds the container root `RS1`.
    pub fn container_root() -> Self {
        Self(Self::CONTAINER_ROOT.to_string())
    }

    /// Builds the child ID for the `ordinal`-th (1-based) sibling of `kind`
    /// under `parent`.
    pub fn child_of(parent: &ArchivalId, kind: NodeKind, ordinal: u32) -> Result<Self, PipelineError> {
        if ordinal == 0 {
            return Err(PipelineError::validation_error("archival ID ordinal must be >= 1"));
        }
        Ok(Self(format!("{}_{}{}", parent.0, kind.segment_prefix(), ordinal)))
    }

    /// Parses an already-formatted ID string, validating its shape.
    pub fn parse(raw: impl Into<String>) -> Result<Self, PipelineError> {
        let raw = raw.into();
        if raw.is_empty() || !raw.starts_with("RS1") {
            return Err(PipelineError::validation_error(format!(
                "archival ID must start with the container root RS1: {raw}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the container root or one of the three medium roots,
    /// i.e. a node with no Instantiation of its own (§3 invariant 1
    /// excludes roots; §8 invariant 4 "excluding RS1 logical root").
    pub fn is_container_root(&self) -> bool {
        self.0 == Self::CONTAINER_ROOT || self.is_medium_root()
    }

    pub fn is_medium_root(&self) -> bool {
        Self::MEDIUM_ROOTS.contains(&self.0.as_str())
    }

    /// Depth in the archival hierarchy, counted from the container root at
    /// depth 0: `RS1` → 0, `RS1_RS1` → 1, `RS1_RS1_RS1` → 2, etc. Matches
    /// the walker's per-node depth counter (§8 invariant 2).
    pub fn depth(&self) -> u32 {
        self.0.matches('_').count() as u32
    }

    /// The parent ID, or `None` for the container root.
    pub fn parent(&self) -> Option<ArchivalId> {
        self.0.rfind('_').map(|idx| ArchivalId(self.0[..idx].to_string()))
    }
}

impl fmt::Display for ArchivalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_root_is_rs1() {
        assert_eq!(ArchivalId::container_root().as_str(), "RS1");
    }

    #[test]
    fn child_ids_use_kind_specific_prefix() {
        let root = ArchivalId::container_root();
        let rs = ArchivalId::child_of(&root, NodeKind::RecordSet, 1).unwrap();
        let r = ArchivalId::child_of(&rs, NodeKind::Record, 4).unwrap();
        assert_eq!(rs.as_str(), "RS1_RS1");
        assert_eq!(r.as_str(), "RS1_RS1_R4");
    }

    #[test]
    fn depth_counts_underscores() {
        assert_eq!(ArchivalId::container_root().depth(), 0);
        assert_eq!(ArchivalId::parse("RS1_RS1").unwrap().depth(), 1);
        assert_eq!(ArchivalId::parse("RS1_RS1_RS2_R3").unwrap().depth(), 3);
    }

    #[test]
    fn parent_strips_last_segment() {
        let id = ArchivalId::parse("RS1_RS1_R4").unwrap();
        assert_eq!(id.parent().unwrap().as_str(), "RS1_RS1");
        assert!(ArchivalId::container_root().parent().is_none());
    }

    #[test]
    fn medium_roots_are_recognized() {
        assert!(ArchivalId::parse("RS1_RS1").unwrap().is_medium_root());
        assert!(!ArchivalId::parse("RS1_RS1_R1").unwrap().is_medium_root());
    }

    #[test]
    fn zero_ordinal_is_rejected() {
        assert!(ArchivalId::child_of(&ArchivalId::container_root(), NodeKind::Record, 0).is_err());
    }
}
