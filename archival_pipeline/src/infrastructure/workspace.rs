// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Workspace checkpoints (§6.5)
//!
//! Every driver stage is also its own standalone CLI subcommand (`walk`,
//! `hash`, `build-structure`, ...), so a stage invoked on its own has no
//! prior stage's in-memory output to build on. This module is the
//! read/write boundary for the intermediate JSON files each stage leaves
//! behind under `PipelineConfig::workspace_dir`, one subdirectory per
//! medium, so a later standalone invocation picks up exactly where the
//! previous one left off. Grounded on the teacher's `infrastructure`
//! pattern of small, single-purpose adapters wrapping `std::fs` +
//! `serde_json` for on-disk state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::value_objects::medium::Medium;

use crate::application::services::fs_walker::WalkEvent;
use crate::application::services::hash_worker::HashedRecord;

const WALK_FILE: &str = "walk.json";
const HASHED_FILE: &str = "hashed.json";

fn medium_dir(workspace_dir: &Path, medium: Medium) -> PathBuf {
    workspace_dir.join(medium.cli_token())
}

fn ensure_dir(dir: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(dir)?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let bytes = fs::read(path)?;
    let value = serde_json::from_slice(&bytes)?;
    Ok(value)
}

/// Persists a completed walk so `hash`, `build-structure`, and later
/// stages can be invoked standalone without re-walking the filesystem.
pub fn save_walk(workspace_dir: &Path, medium: Medium, events: &[WalkEvent]) -> Result<(), PipelineError> {
    let dir = medium_dir(workspace_dir, medium);
    ensure_dir(&dir)?;
    write_json(&dir.join(WALK_FILE), &events.to_vec())
}

pub fn load_walk(workspace_dir: &Path, medium: Medium) -> Result<Vec<WalkEvent>, PipelineError> {
    read_json(&medium_dir(workspace_dir, medium).join(WALK_FILE))
}

pub fn walk_checkpoint_exists(workspace_dir: &Path, medium: Medium) -> bool {
    medium_dir(workspace_dir, medium).join(WALK_FILE).is_file()
}

/// Persists completed fixity records so `build-structure` and
/// `check-integrity` can be invoked standalone without rehashing.
pub fn save_hashed(workspace_dir: &Path, medium: Medium, records: &[HashedRecord]) -> Result<(), PipelineError> {
    let dir = medium_dir(workspace_dir, medium);
    ensure_dir(&dir)?;
    write_json(&dir.join(HASHED_FILE), &records.to_vec())
}

pub fn load_hashed(workspace_dir: &Path, medium: Medium) -> Result<Vec<HashedRecord>, PipelineError> {
    read_json(&medium_dir(workspace_dir, medium).join(HASHED_FILE))
}

pub fn hashed_checkpoint_exists(workspace_dir: &Path, medium: Medium) -> bool {
    medium_dir(workspace_dir, medium).join(HASHED_FILE).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use archival_pipeline_domain::value_objects::archival_id::{ArchivalId, NodeKind};
    use archival_pipeline_domain::value_objects::sha256_hex::Sha256Hex;
    use tempfile::tempdir;

    #[test]
    fn walk_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let events = vec![WalkEvent {
            id: ArchivalId::container_root(),
            kind: NodeKind::RecordSet,
            absolute_path: PathBuf::from("/base"),
            relative_path: "/".to_string(),
            parent: None,
            depth: 0,
        }];
        save_walk(dir.path(), Medium::HardDisk, &events).unwrap();
        assert!(walk_checkpoint_exists(dir.path(), Medium::HardDisk));
        let loaded = load_walk(dir.path(), Medium::HardDisk).unwrap();
        assert_eq!(loaded, events);
    }

    #[test]
    fn missing_checkpoint_is_reported_not_panicked() {
        let dir = tempdir().unwrap();
        assert!(!walk_checkpoint_exists(dir.path(), Medium::Floppy));
        assert!(load_walk(dir.path(), Medium::Floppy).is_err());
    }

    #[test]
    fn hashed_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let id = ArchivalId::child_of(&ArchivalId::container_root(), NodeKind::Record, 1).unwrap();
        let records = vec![HashedRecord { id, digest: Sha256Hex::of_bytes(b"x"), byte_size: 1 }];
        save_hashed(dir.path(), Medium::HardDiskExternal, &records).unwrap();
        assert!(hashed_checkpoint_exists(dir.path(), Medium::HardDiskExternal));
        let loaded = load_hashed(dir.path(), Medium::HardDiskExternal).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn different_media_use_separate_checkpoint_directories() {
        let dir = tempdir().unwrap();
        save_walk(dir.path(), Medium::HardDisk, &[]).unwrap();
        assert!(!walk_checkpoint_exists(dir.path(), Medium::Floppy));
    }
}
