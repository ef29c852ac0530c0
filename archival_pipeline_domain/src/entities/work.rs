// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Work entity (§3): a logical bibliographic work in a cycle/trilogy,
//! grounded on `original_source/phase#3/step#1_works_evangelisti.py`
//! ("Evangelisti Works Modeler - LRMoo F1 Work Relations").

use crate::value_objects::archival_id::ArchivalId;

/// An optional bibliographic Work, loaded from an external spreadsheet
/// (§3) and linked to the Records/RecordSets that realize it. The source
/// script "propagate[s] from RecordSets to child Records" — this is
/// modeled here as [`WorkAssignment::propagate_to_children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Work {
    pub label: String,
}

impl Work {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

/// Links one archival node to the [`Work`] it is part of (`bodi:isPartOfWork`,
/// §4.3 prefixes module `BODI_IS_PART_OF_WORK`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkAssignment {
    pub node: ArchivalId,
    pub work: Work,
    /// `true` if this assignment was propagated down from a RecordSet
    /// rather than read directly off the spreadsheet row for this node.
    pub propagated: bool,
}

impl WorkAssignment {
    pub fn direct(node: ArchivalId, work: Work) -> Self {
        Self { node, work, propagated: false }
    }

    /// Produces the propagated assignment a child record inherits from its
    /// parent RecordSet's direct assignment.
    pub fn propagate_to_child(&self, child: ArchivalId) -> Self {
        Self { node: child, work: self.work.clone(), propagated: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propagated_assignment_keeps_the_same_work() {
        let parent = WorkAssignment::direct(ArchivalId::parse("RS1_RS1_RS1").unwrap(), Work::new("Nicolas Eymerich trilogy"));
        let child = parent.propagate_to_child(ArchivalId::parse("RS1_RS1_RS1_R1").unwrap());
        assert!(child.propagated);
        assert_eq!(child.work, parent.work);
    }
}
