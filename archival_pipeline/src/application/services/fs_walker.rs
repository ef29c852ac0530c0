// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # FSWalker (§4.1)
//!
//! Deterministic, left-to-right, case-insensitive-alphabetic directory
//! traversal. Assigns each node a stable [`ArchivalId`] as a pure function
//! of the walk order, so re-running over an unchanged tree reproduces the
//! same IDs (§8 invariant 1). Grounded on the teacher's
//! `application/services/file_processor.rs` traversal/progress-reporting
//! shape, generalized from file-processing to pure enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use archival_pipeline_domain::value_objects::archival_id::{ArchivalId, NodeKind};
use archival_pipeline_domain::value_objects::medium::Medium;

use crate::application::report::StageReport;

/// One node discovered by the walk: its assigned ID, its kind, its
/// absolute and medium-relative paths, its parent ID (`None` for the
/// medium root), and its depth (§8 invariant 2: child depth = parent depth
/// + 1, counted from the medium root at depth 0). Serializable so a walk
/// can be checkpointed to the workspace directory and read back by a
/// later, separately invoked stage (`hash`, `build-structure`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkEvent {
    pub id: ArchivalId,
    pub kind: NodeKind,
    pub absolute_path: PathBuf,
    pub relative_path: String,
    pub parent: Option<ArchivalId>,
    pub depth: u32,
}

/// The ordered output of one full traversal, plus the per-path errors
/// FSWalker recorded without aborting (§4.1, §7 "Walker" error kind).
#[derive(Debug, Default, Clone)]
pub struct WalkResult {
    pub events: Vec<WalkEvent>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Walks `base_path` for `medium`, assigning the medium's fixed root ID to
/// the base directory itself and depth-first child IDs below it.
///
/// The walker never follows symlinks and never crosses device boundaries
/// (§4.1); both conditions are detected per-entry and recorded as errors
/// rather than aborting the walk.
pub fn walk(base_path: &Path, medium: Medium) -> WalkResult {
    let mut result = WalkResult::default();
    let root_id = medium.root_id();
    let root_device = fs::metadata(base_path).ok().map(device_id);

    result.events.push(WalkEvent {
        id: root_id.clone(),
        kind: NodeKind::RecordSet,
        absolute_path: base_path.to_path_buf(),
        relative_path: "/".to_string(),
        parent: None,
        depth: 0,
    });

    walk_dir(base_path, base_path, &root_id, 1, root_device, &mut result);
    result
}

fn device_id(metadata: fs::Metadata) -> u64 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        metadata.dev()
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        0
    }
}

fn walk_dir(base_path: &Path, dir: &Path, parent_id: &ArchivalId, depth: u32, root_device: Option<u64>, result: &mut WalkResult) {
    let mut entries = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.file_name().map(|name| name != ".DS_Store").unwrap_or(true))
            .collect::<Vec<_>>(),
        Err(err) => {
            result.errors.push((dir.to_path_buf(), err.to_string()));
            return;
        }
    };

    // Case-insensitive alphabetic order (§4.1).
    entries.sort_by_key(|p| p.file_name().map(|n| n.to_string_lossy().to_lowercase()).unwrap_or_default());

    let mut dir_ordinal = 0u32;
    let mut file_ordinal = 0u32;

    for path in entries {
        let file_type = match path.symlink_metadata() {
            Ok(meta) => meta.file_type(),
            Err(err) => {
                result.errors.push((path.clone(), err.to_string()));
                continue;
            }
        };

        if file_type.is_symlink() {
            result.errors.push((path.clone(), "symlink skipped".to_string()));
            continue;
        }

        if let Some(expected) = root_device {
            if let Ok(meta) = fs::metadata(&path) {
                if device_id(meta) != expected {
                    result.errors.push((path.clone(), "cross-device boundary skipped".to_string()));
                    continue;
                }
            }
        }

        let relative = relative_path_of(base_path, &path);

        if path.is_dir() {
            dir_ordinal += 1;
            let id = match ArchivalId::child_of(parent_id, NodeKind::RecordSet, dir_ordinal) {
                Ok(id) => id,
                Err(err) => {
                    result.errors.push((path.clone(), err.to_string()));
                    continue;
                }
            };
            result.events.push(WalkEvent {
                id: id.clone(),
                kind: NodeKind::RecordSet,
                absolute_path: path.clone(),
                relative_path: relative,
                parent: Some(parent_id.clone()),
                depth,
            });
            walk_dir(base_path, &path, &id, depth + 1, root_device, result);
        } else {
            file_ordinal += 1;
            let id = match ArchivalId::child_of(parent_id, NodeKind::Record, file_ordinal) {
                Ok(id) => id,
                Err(err) => {
                    result.errors.push((path.clone(), err.to_string()));
                    continue;
                }
            };
            result.events.push(WalkEvent {
                id,
                kind: NodeKind::Record,
                absolute_path: path,
                relative_path: relative,
                parent: Some(parent_id.clone()),
                depth,
            });
        }
    }
}

fn relative_path_of(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| path.to_string_lossy().to_string())
}

impl WalkResult {
    pub fn into_report(&self) -> StageReport {
        let mut report = StageReport::new("fs_walker")
            .with_count("record_sets", self.events.iter().filter(|e| e.kind == NodeKind::RecordSet).count() as u64)
            .with_count("records", self.events.iter().filter(|e| e.kind == NodeKind::Record).count() as u64)
            .with_count("errors", self.errors.len() as u64);
        for (path, reason) in &self.errors {
            report.record_error(path.display().to_string(), reason.clone());
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_tree() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Alpha")).unwrap();
        fs::create_dir_all(dir.path().join("beta")).unwrap();
        fs::write(dir.path().join("z.txt"), b"z").unwrap();
        fs::write(dir.path().join("Alpha/a.txt"), b"a").unwrap();
        fs::write(dir.path().join("beta/b.txt"), b"b").unwrap();
        dir
    }

    #[test]
    fn walk_is_case_insensitive_alphabetic() {
        let dir = make_tree();
        let result = walk(dir.path(), Medium::HardDisk);
        // Expect ordering: Alpha (dir) before beta (dir) before z.txt (file),
        // directories and files are each ordered among their own kind.
        let record_sets: Vec<_> = result
            .events
            .iter()
            .filter(|e| e.kind == NodeKind::RecordSet && e.depth == 1)
            .map(|e| e.absolute_path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(record_sets, vec!["Alpha", "beta"]);
    }

    #[test]
    fn depths_increase_by_exactly_one() {
        let dir = make_tree();
        let result = walk(dir.path(), Medium::HardDisk);
        for event in &result.events {
            if let Some(parent_id) = &event.parent {
                let parent_depth = result.events.iter().find(|e| &e.id == parent_id).unwrap().depth;
                assert_eq!(event.depth, parent_depth + 1);
            }
        }
    }

    #[test]
    fn ids_are_deterministic_across_runs() {
        let dir = make_tree();
        let first = walk(dir.path(), Medium::HardDisk);
        let second = walk(dir.path(), Medium::HardDisk);
        assert_eq!(first.events.iter().map(|e| e.id.clone()).collect::<Vec<_>>(), second.events.iter().map(|e| e.id.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn ds_store_is_excluded_before_id_assignment() {
        let dir = make_tree();
        fs::write(dir.path().join(".DS_Store"), b"junk").unwrap();
        fs::write(dir.path().join("Alpha/.DS_Store"), b"junk").unwrap();
        let with_ds_store = walk(dir.path(), Medium::HardDisk);

        let clean_dir = make_tree();
        let without_ds_store = walk(clean_dir.path(), Medium::HardDisk);

        assert_eq!(with_ds_store.events.iter().map(|e| e.id.clone()).collect::<Vec<_>>(), without_ds_store.events.iter().map(|e| e.id.clone()).collect::<Vec<_>>());
        assert!(with_ds_store.events.iter().all(|e| e.absolute_path.file_name().map(|n| n != ".DS_Store").unwrap_or(true)));
    }

    #[test]
    fn unreadable_directory_is_recorded_not_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does_not_exist");
        let result = walk(&missing, Medium::HardDisk);
        assert_eq!(result.events.len(), 1); // just the root event
        assert_eq!(result.errors.len(), 1);
    }
}
