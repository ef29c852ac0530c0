// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! DROID-like format identifier (§4.6, §6.2): a subprocess adapter that
//! invokes an external signature-based format-identification tool over a
//! batch of paths and parses its CSV report from a scratch workspace.
//! Runs the batch in groups of at most [`MAX_BATCH_FILES`] files (§4.6
//! "batches capped at 25 files per subprocess invocation"), each in its
//! own process group via [`archival_pipeline_bootstrap::platform`] so a
//! timed-out invocation can be torn down without leaving the tool's own
//! child processes running. Grounded on `original_source/phase#2` DROID
//! invocation shape (batch submitted as a profile run, results read back
//! as CSV) and on the teacher's `tokio::process` subprocess-adapter
//! pattern plus its platform process-group abstraction.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use archival_pipeline_bootstrap::platform::{create_platform, Platform};
use archival_pipeline_domain::entities::technical_metadata::ExtractorKind;
use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::services::metadata_extractor::{ExtractionResult, MetadataExtractor};

/// Upper bound on how many paths are handed to one subprocess invocation
/// (§4.6).
pub const MAX_BATCH_FILES: usize = 25;

/// Grace period between SIGTERM and SIGKILL once a batch times out.
const TERMINATE_GRACE: Duration = Duration::from_secs(5);

/// Drives a DROID-compatible binary: `<binary> -a <paths...> -o <report>`,
/// then parses the CSV profile report it writes into `workspace`.
pub struct FormatIdentifierAdapter {
    binary: PathBuf,
    timeout: Duration,
    platform: Box<dyn Platform>,
}

impl FormatIdentifierAdapter {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { binary: binary.into(), timeout, platform: create_platform() }
    }
}

#[async_trait]
impl MetadataExtractor for FormatIdentifierAdapter {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::FormatIdentifier
    }

    async fn extract(&self, batch: &[PathBuf], workspace: &Path) -> Result<Vec<ExtractionResult>, PipelineError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let mut results = Vec::new();
        for chunk in batch.chunks(MAX_BATCH_FILES) {
            results.append(&mut self.extract_chunk(chunk, workspace).await?);
        }
        Ok(results)
    }
}

impl FormatIdentifierAdapter {
    async fn extract_chunk(&self, chunk: &[PathBuf], workspace: &Path) -> Result<Vec<ExtractionResult>, PipelineError> {
        let report_path = workspace.join(format!("droid-{}.csv", uuid_like(chunk)));

        let mut command = Command::new(&self.binary);
        command.arg("-a");
        for path in chunk {
            command.arg(path);
        }
        command.arg("-o").arg(&report_path);
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        self.platform.prepare_new_group(&mut command);

        let mut child = command.spawn().map_err(|err| PipelineError::extractor_error("DROID", format!("failed to spawn: {err}")))?;
        let group = self.platform.group_of(&child).map_err(|err| PipelineError::extractor_error("DROID", err.to_string()))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => return Err(PipelineError::extractor_error("DROID", format!("subprocess error: {err}"))),
            Err(_) => {
                let _ = self.platform.terminate_group(group, TERMINATE_GRACE).await;
                return Err(PipelineError::extractor_error("DROID", format!("timed out after {:?}", self.timeout)));
            }
        };
        if !output.status.success() {
            return Err(PipelineError::extractor_error("DROID", format!("exit status {}: {}", output.status, String::from_utf8_lossy(&output.stderr))));
        }

        let csv_body = tokio::fs::read_to_string(&report_path).await.map_err(|err| PipelineError::extractor_error("DROID", format!("reading report: {err}")))?;
        parse_droid_csv(&csv_body)
    }
}

/// Parses DROID's CSV profile output: one row per path, columns include
/// `FILE_PATH`, `PUID`, `FORMAT_NAME`, `MIME_TYPE`, `IDENTIFICATION_METHOD`.
fn parse_droid_csv(body: &str) -> Result<Vec<ExtractionResult>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(body.as_bytes());
    let headers = reader.headers().map_err(|err| PipelineError::extractor_error("DROID", err.to_string()))?.clone();
    let mut results = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|err| PipelineError::extractor_error("DROID", err.to_string()))?;
        let mut fields = std::collections::HashMap::new();
        let mut path = None;
        for (header, value) in headers.iter().zip(record.iter()) {
            if value.is_empty() {
                continue;
            }
            if header.eq_ignore_ascii_case("FILE_PATH") {
                path = Some(PathBuf::from(value));
            } else {
                fields.insert(header.to_string(), value.to_string());
            }
        }
        let Some(path) = path else {
            continue;
        };
        results.push(ExtractionResult { path, fields, confidence: None });
    }
    Ok(results)
}

/// A stable, content-derived token for the scratch report filename —
/// deliberately not random, so reruns with the same batch are reproducible.
fn uuid_like(batch: &[PathBuf]) -> String {
    use archival_pipeline_domain::value_objects::sha256_hex::Sha256Hex;
    let joined = batch.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join("\n");
    Sha256Hex::of_bytes(joined.as_bytes()).as_str()[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_droid_style_csv_report() {
        let csv_body = "FILE_PATH,PUID,FORMAT_NAME,MIME_TYPE\n/a/b.jpg,fmt/44,JPEG File Interchange Format,image/jpeg\n";
        let results = parse_droid_csv(csv_body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, PathBuf::from("/a/b.jpg"));
        assert_eq!(results[0].fields.get("MIME_TYPE").unwrap(), "image/jpeg");
    }

    #[test]
    fn rows_missing_a_file_path_are_skipped() {
        let csv_body = "FILE_PATH,PUID\n,fmt/44\n";
        let results = parse_droid_csv(csv_body).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn scratch_filename_is_deterministic_for_the_same_batch() {
        let batch = vec![PathBuf::from("/a.jpg"), PathBuf::from("/b.jpg")];
        assert_eq!(uuid_like(&batch), uuid_like(&batch));
    }
}
