// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! File-backed [`QuadSink`] (§4.7): every generator component appends its
//! quads to one in-memory N-Quads buffer for the run, which is flushed to
//! a single timestamped file under the workspace directory regardless of
//! `--dry-run` — generating the graph and loading it into the triple store
//! are separate concerns (§4.4), so the on-disk N-Quads export must exist
//! even when the load is skipped.
//!
//! Grounded on `infrastructure::workspace`'s checkpoint-file pattern
//! (`fs::create_dir_all` + `fs::write`), generalized from JSON checkpoints
//! to an append-only N-Quads buffer.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::rdf::nquads::write_nquads;
use archival_pipeline_domain::rdf::quad::Quad;
use archival_pipeline_domain::repositories::QuadSink;
use async_trait::async_trait;

/// Appends every quad it is given to an in-memory buffer and rewrites a
/// single timestamped N-Quads file on disk on each call. The file name is
/// fixed for the lifetime of the sink, so repeated `write_quads` calls
/// accumulate into one growing document rather than scattering many
/// partial files across a run.
pub struct FileQuadSink {
    path: PathBuf,
    buffer: Mutex<Vec<Quad>>,
}

impl FileQuadSink {
    /// Creates a sink that writes to `<workspace_dir>/nquads/<label>_<timestamp>.nq`.
    /// `timestamp` is formatted `YYYYMMDDTHHMMSSZ`, passed in by the caller
    /// (typically `Utc::now()` at startup) so the sink itself stays free of
    /// wall-clock reads.
    pub fn new(workspace_dir: &Path, label: &str, timestamp: impl std::fmt::Display) -> Result<Self, PipelineError> {
        let dir = workspace_dir.join("nquads");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{label}_{timestamp}.nq"));
        Ok(Self { path, buffer: Mutex::new(Vec::new()) })
    }

    /// The path this sink writes to, for callers that want to report it
    /// (e.g. in the `Run` command's final report).
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, quads: &[Quad]) -> Result<(), PipelineError> {
        let body = write_nquads(quads);
        std::fs::write(&self.path, body)?;
        Ok(())
    }
}

#[async_trait]
impl QuadSink for FileQuadSink {
    async fn write_quads(&self, quads: &[Quad]) -> Result<(), PipelineError> {
        let snapshot = {
            let mut buffer = self.buffer.lock().map_err(|_| PipelineError::internal_error("quad sink buffer poisoned"))?;
            buffer.extend(quads.iter().cloned());
            buffer.clone()
        };
        self.flush(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archival_pipeline_domain::rdf::term::{GraphName, Iri, Literal};

    fn sample_quad(n: usize) -> Quad {
        Quad::new(
            Iri::new_unchecked(format!("http://example.org/RS1_R{n}")),
            Iri::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label"),
            Literal::plain(format!("file{n}")),
            GraphName(Iri::new_unchecked("http://example.org/structure/RS1")),
        )
    }

    #[tokio::test]
    async fn writes_a_timestamped_file_under_the_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileQuadSink::new(dir.path(), "hd", "20250712T000000Z").unwrap();
        sink.write_quads(&[sample_quad(1)]).await.unwrap();
        assert!(sink.path().exists());
        let body = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(body.lines().count(), 1);
    }

    #[tokio::test]
    async fn repeated_writes_accumulate_rather_than_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileQuadSink::new(dir.path(), "hd", "20250712T000000Z").unwrap();
        sink.write_quads(&[sample_quad(1)]).await.unwrap();
        sink.write_quads(&[sample_quad(2)]).await.unwrap();
        let body = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(body.lines().count(), 2);
    }
}
