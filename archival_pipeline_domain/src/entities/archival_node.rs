// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Record and RecordSet entities (§3), plus their shared Identifier.

use crate::value_objects::archival_id::ArchivalId;

/// Whether an archival node is a leaf (file) or branch (directory), per
/// §3's Record/RecordSet distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeVariant {
    Record,
    RecordSet,
}

/// A Record (file) or RecordSet (directory) discovered by FSWalker. Every
/// non-root node gets exactly one [`crate::entities::instantiation::Instantiation`]
/// (§3 invariant 1); the `RS1` container root and its emission are handled
/// separately by StructureBuilder since it has no filesystem counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivalNode {
    pub id: ArchivalId,
    pub variant: NodeVariant,
    /// `rdfs:label`: the filename (or, for the three medium roots, the
    /// overridden human name — §4.3).
    pub label: String,
    pub parent: Option<ArchivalId>,
    /// Depth from the container root, assigned by FSWalker and consumed
    /// unchanged by StructureBuilder (§8 invariant 2).
    pub depth: u32,
}

impl ArchivalNode {
    pub fn new(id: ArchivalId, variant: NodeVariant, label: impl Into<String>, parent: Option<ArchivalId>, depth: u32) -> Self {
        Self { id, variant, label: label.into(), parent, depth }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.variant, NodeVariant::Record)
    }

    pub fn is_record_set(&self) -> bool {
        matches!(self.variant, NodeVariant::RecordSet)
    }
}

/// The 1:1 Identifier object accompanying every Record/RecordSet (§3).
/// `label` is always the entity's own ID string and `type` is the fixed
/// literal `"unique-id"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub owner: ArchivalId,
}

impl Identifier {
    pub const TYPE_LABEL: &'static str = "unique-id";

    pub fn for_owner(owner: ArchivalId) -> Self {
        Self { owner }
    }

    pub fn label(&self) -> &str {
        self.owner.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_label_is_owner_id() {
        let id = ArchivalId::parse("RS1_RS1_R3").unwrap();
        let ident = Identifier::for_owner(id.clone());
        assert_eq!(ident.label(), "RS1_RS1_R3");
        assert_eq!(Identifier::TYPE_LABEL, "unique-id");
    }

    #[test]
    fn node_variant_predicates() {
        let node = ArchivalNode::new(
            ArchivalId::parse("RS1_RS1_R1").unwrap(),
            NodeVariant::Record,
            "file.txt",
            Some(ArchivalId::parse("RS1_RS1").unwrap()),
            2,
        );
        assert!(node.is_record());
        assert!(!node.is_record_set());
    }
}
