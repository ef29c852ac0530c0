// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Work linking (§3, §9)
//!
//! Loads a spreadsheet of `(archival id, work label)` rows and propagates
//! each RecordSet assignment down to its child Records, matching the
//! original source's `step#1_works_evangelisti.py` behavior
//! ("propagate from RecordSets to child Records"). Emits
//! `bodi:isPartOfWork` quads. Grounded on the teacher's CSV-ingest
//! pattern (`csv` crate, already in the workspace dependency set for
//! this exact purpose).

use std::collections::{HashMap, HashSet};

use archival_pipeline_domain::entities::work::{Work, WorkAssignment};
use archival_pipeline_domain::rdf::prefixes::BODI_IS_PART_OF_WORK;
use archival_pipeline_domain::rdf::quad::Quad;
use archival_pipeline_domain::rdf::term::GraphName;
use archival_pipeline_domain::value_objects::archival_id::ArchivalId;
use archival_pipeline_domain::value_objects::graph_iri::IriFactory;

use crate::application::report::StageReport;

/// One row of the work-assignment spreadsheet: an archival ID and the
/// work label it's directly assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRow {
    pub node: ArchivalId,
    pub work_label: String,
}

/// Parses a CSV body with `archival_id,work_label` columns (header row
/// included) into [`WorkRow`]s, recording malformed rows without aborting
/// the whole file (§7).
pub fn parse_csv(body: &str) -> (Vec<WorkRow>, StageReport) {
    let mut report = StageReport::new("work_linker:parse");
    let mut rows = Vec::new();
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(body.as_bytes());

    for (line_no, record) in reader.records().enumerate() {
        match record {
            Ok(record) => match (record.get(0), record.get(1)) {
                (Some(id_str), Some(label)) => match ArchivalId::parse(id_str.trim()) {
                    Ok(id) => rows.push(WorkRow { node: id, work_label: label.trim().to_string() }),
                    Err(err) => report.record_error(format!("row {}", line_no + 2), err.to_string()),
                },
                _ => report.record_error(format!("row {}", line_no + 2), "missing archival_id or work_label column"),
            },
            Err(err) => report.record_error(format!("row {}", line_no + 2), err.to_string()),
        }
    }

    report = report.with_count("rows", rows.len() as u64);
    (rows, report)
}

/// Builds direct assignments from the parsed rows, then propagates every
/// RecordSet assignment to its children using the walker's parent index
/// (`child -> parent`), per row. Explicit mappings always win over
/// propagated ones (§4.10): a node with its own row in the spreadsheet
/// never receives a propagated assignment from an ancestor, and
/// propagation doesn't descend past it either, so its own descendants are
/// only ever reached via its own direct row (or a later one of theirs).
pub fn propagate(rows: &[WorkRow], children_by_parent: &HashMap<ArchivalId, Vec<ArchivalId>>) -> Vec<WorkAssignment> {
    let direct_nodes: HashSet<ArchivalId> = rows.iter().map(|row| row.node.clone()).collect();
    let mut assignments = Vec::new();
    for row in rows {
        let direct = WorkAssignment::direct(row.node.clone(), Work::new(row.work_label.clone()));
        assignments.push(direct.clone());
        propagate_recursive(&direct, children_by_parent, &direct_nodes, &mut assignments);
    }
    assignments
}

fn propagate_recursive(assignment: &WorkAssignment, children_by_parent: &HashMap<ArchivalId, Vec<ArchivalId>>, direct_nodes: &HashSet<ArchivalId>, out: &mut Vec<WorkAssignment>) {
    if let Some(children) = children_by_parent.get(&assignment.node) {
        for child in children {
            if direct_nodes.contains(child) {
                continue;
            }
            let propagated = assignment.propagate_to_child(child.clone());
            out.push(propagated.clone());
            propagate_recursive(&propagated, children_by_parent, direct_nodes, out);
        }
    }
}

pub fn emit(factory: &IriFactory, graph: &GraphName, assignment: &WorkAssignment, quads: &mut Vec<Quad>) {
    let subject = factory.record_or_set(&assignment.node);
    quads.push(Quad::new(
        subject,
        archival_pipeline_domain::rdf::term::Iri::new_unchecked(BODI_IS_PART_OF_WORK),
        archival_pipeline_domain::rdf::term::Literal::plain(assignment.work.label.clone()),
        graph.clone(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_rows() {
        let csv = "archival_id,work_label\nRS1_RS1_RS1,Nicolas Eymerich trilogy\n";
        let (rows, report) = parse_csv(csv);
        assert_eq!(rows.len(), 1);
        assert!(report.success);
        assert_eq!(rows[0].work_label, "Nicolas Eymerich trilogy");
    }

    #[test]
    fn malformed_archival_id_is_recorded_not_fatal() {
        let csv = "archival_id,work_label\nNOTANID,Some Work\nRS1_RS1_RS2,Another Work\n";
        let (rows, report) = parse_csv(csv);
        assert_eq!(rows.len(), 1);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn direct_assignment_propagates_to_all_descendants() {
        let parent = ArchivalId::parse("RS1_RS1_RS1").unwrap();
        let child = ArchivalId::parse("RS1_RS1_RS1_R1").unwrap();
        let grandchild = ArchivalId::parse("RS1_RS1_RS1_R1_R1").unwrap();
        let mut children = HashMap::new();
        children.insert(parent.clone(), vec![child.clone()]);
        children.insert(child.clone(), vec![grandchild.clone()]);
        let rows = vec![WorkRow { node: parent, work_label: "Trilogy".into() }];
        let assignments = propagate(&rows, &children);
        assert_eq!(assignments.len(), 3);
        assert!(assignments.iter().all(|a| a.work.label == "Trilogy"));
        assert!(assignments.iter().filter(|a| a.propagated).count() == 2);
    }

    #[test]
    fn explicit_row_on_a_descendant_wins_over_propagation() {
        let parent = ArchivalId::parse("RS1_RS1_RS1").unwrap();
        let child = ArchivalId::parse("RS1_RS1_RS1_R1").unwrap();
        let grandchild = ArchivalId::parse("RS1_RS1_RS1_R1_R1").unwrap();
        let mut children = HashMap::new();
        children.insert(parent.clone(), vec![child.clone()]);
        children.insert(child.clone(), vec![grandchild.clone()]);
        let rows = vec![WorkRow { node: parent, work_label: "Trilogy".into() }, WorkRow { node: child.clone(), work_label: "Solo Work".into() }];
        let assignments = propagate(&rows, &children);

        let child_assignments: Vec<_> = assignments.iter().filter(|a| a.node == child).collect();
        assert_eq!(child_assignments.len(), 1, "the child's own row must win, not also receive a propagated assignment from its parent");
        assert!(!child_assignments[0].propagated);
        assert_eq!(child_assignments[0].work.label, "Solo Work");

        let grandchild_assignment = assignments.iter().find(|a| a.node == grandchild).unwrap();
        assert_eq!(grandchild_assignment.work.label, "Solo Work", "propagation below the explicit row follows the explicit row, not the ancestor it overrode");
    }
}
