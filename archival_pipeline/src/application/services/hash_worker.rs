// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HashWorker (§4.2)
//!
//! Computes SHA-256 fixity for every Record discovered by FSWalker,
//! streaming file contents in [`HASH_BLOCK_SIZE`] blocks rather than
//! reading whole files into memory. Grounded on the teacher's
//! `services/file_io_service.rs` streamed-read shape, narrowed from a
//! general chunked-read/write service down to read-only digesting.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use archival_pipeline_domain::value_objects::archival_id::ArchivalId;
use archival_pipeline_domain::value_objects::sha256_hex::Sha256Hex;

use crate::application::report::StageReport;

/// One file's computed fixity, keyed by the `ArchivalId` FSWalker assigned
/// it. Serializable for the same checkpoint reason as [`crate::application::services::fs_walker::WalkEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedRecord {
    pub id: ArchivalId,
    pub digest: Sha256Hex,
    pub byte_size: u64,
}

/// Hashes every `(id, path)` pair, skipping paths that no longer exist or
/// fail to open and recording those as per-path errors (§4.2: hashing
/// errors never abort the whole stage — §7).
///
/// Resumable: a caller re-running after a partial failure passes only the
/// subset of `(id, path)` pairs still missing a recorded digest, so the
/// worker never re-hashes files that already succeeded (§4.2 "resumable
/// after interruption").
pub fn hash_all<'a>(entries: impl IntoIterator<Item = (&'a ArchivalId, &'a Path)>) -> (Vec<HashedRecord>, StageReport) {
    let mut hashed = Vec::new();
    let mut report = StageReport::new("hash_worker");

    for (id, path) in entries {
        match hash_one(path) {
            Ok((digest, byte_size)) => {
                hashed.push(HashedRecord { id: id.clone(), digest, byte_size });
            }
            Err(message) => {
                report.record_error(path.display().to_string(), message);
            }
        }
    }

    report = report
        .with_count("hashed", hashed.len() as u64)
        .with_count("errors", report.errors.len() as u64);
    if !report.errors.is_empty() {
        report.fail();
    }
    (hashed, report)
}

fn hash_one(path: &Path) -> Result<(Sha256Hex, u64), String> {
    let file = File::open(path).map_err(|err| err.to_string())?;
    let byte_size = file.metadata().map_err(|err| err.to_string())?.len();
    let digest = Sha256Hex::of_reader(BufReader::new(file)).map_err(|err| err.to_string())?;
    Ok((digest, byte_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use archival_pipeline_domain::value_objects::archival_id::NodeKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn hashes_known_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"hello").unwrap();
        let id = ArchivalId::child_of(&ArchivalId::container_root(), NodeKind::Record, 1).unwrap();
        let (hashed, report) = hash_all(vec![(&id, path.as_path())]);
        assert_eq!(hashed.len(), 1);
        assert!(report.success);
        assert_eq!(hashed[0].digest.as_str(), Sha256Hex::of_bytes(b"hello").as_str());
        assert_eq!(hashed[0].byte_size, 5);
    }

    #[test]
    fn missing_file_is_recorded_not_fatal_to_others() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("present.txt");
        fs::write(&present, b"x").unwrap();
        let missing = dir.path().join("missing.txt");
        let id1 = ArchivalId::child_of(&ArchivalId::container_root(), NodeKind::Record, 1).unwrap();
        let id2 = ArchivalId::child_of(&ArchivalId::container_root(), NodeKind::Record, 2).unwrap();
        let (hashed, report) = hash_all(vec![(&id1, missing.as_path()), (&id2, present.as_path())]);
        assert_eq!(hashed.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(!report.success);
    }
}
