// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! ExifTool-like media extractor (§4.6, §6.2): a CLI subprocess adapter
//! that invokes an external tool with `-j` (JSON output) over every path
//! in groups of at most [`MAX_BATCH_FILES`] files (§4.6 "batches capped at
//! 25 files per subprocess invocation"), each in its own process group via
//! [`archival_pipeline_bootstrap::platform`] so a timed-out invocation can
//! be torn down without leaving orphaned children. Grounded on
//! `original_source/phase#2` ExifTool batch invocation and the teacher's
//! `tokio::process` subprocess-adapter pattern plus its platform
//! process-group abstraction.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
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

pub struct MediaExtractorAdapter {
    binary: PathBuf,
    timeout: Duration,
    platform: Box<dyn Platform>,
}

impl MediaExtractorAdapter {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { binary: binary.into(), timeout, platform: create_platform() }
    }

    async fn extract_chunk(&self, chunk: &[PathBuf]) -> Result<Vec<ExtractionResult>, PipelineError> {
        let mut command = Command::new(&self.binary);
        command.arg("-j").arg("-n");
        for path in chunk {
            command.arg(path);
        }
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        self.platform.prepare_new_group(&mut command);

        let mut child = command.spawn().map_err(|err| PipelineError::extractor_error("ExifTool", format!("failed to spawn: {err}")))?;
        let group = self.platform.group_of(&child).map_err(|err| PipelineError::extractor_error("ExifTool", err.to_string()))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => return Err(PipelineError::extractor_error("ExifTool", format!("subprocess error: {err}"))),
            Err(_) => {
                let _ = self.platform.terminate_group(group, TERMINATE_GRACE).await;
                return Err(PipelineError::extractor_error("ExifTool", format!("timed out after {:?}", self.timeout)));
            }
        };
        if !output.status.success() {
            return Err(PipelineError::extractor_error("ExifTool", format!("exit status {}: {}", output.status, String::from_utf8_lossy(&output.stderr))));
        }
        parse_exiftool_json(&output.stdout)
    }
}

#[async_trait]
impl MetadataExtractor for MediaExtractorAdapter {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::MediaExtractor
    }

    async fn extract(&self, batch: &[PathBuf], _workspace: &Path) -> Result<Vec<ExtractionResult>, PipelineError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let mut results = Vec::new();
        for chunk in batch.chunks(MAX_BATCH_FILES) {
            results.append(&mut self.extract_chunk(chunk).await?);
        }
        Ok(results)
    }
}

/// ExifTool's `-j` output is a JSON array, one object per input path, each
/// keyed by tag name with `SourceFile` identifying which path it belongs
/// to.
fn parse_exiftool_json(stdout: &[u8]) -> Result<Vec<ExtractionResult>, PipelineError> {
    let json: JsonValue = serde_json::from_slice(stdout).map_err(|err| PipelineError::extractor_error("ExifTool", format!("invalid JSON: {err}")))?;
    let JsonValue::Array(entries) = json else {
        return Err(PipelineError::extractor_error("ExifTool", "expected a JSON array"));
    };

    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let JsonValue::Object(map) = entry else { continue };
        let Some(source_file) = map.get("SourceFile").and_then(JsonValue::as_str) else {
            continue;
        };
        let mut fields = std::collections::HashMap::new();
        for (key, value) in &map {
            if key == "SourceFile" {
                continue;
            }
            let rendered = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                _ => continue,
            };
            fields.insert(key.clone(), rendered);
        }
        results.push(ExtractionResult { path: PathBuf::from(source_file), fields, confidence: None });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_exiftool_json_array() {
        let stdout = br#"[{"SourceFile":"/a.jpg","FileType":"JPEG","ImageWidth":1920}]"#;
        let results = parse_exiftool_json(stdout).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, PathBuf::from("/a.jpg"));
        assert_eq!(results[0].fields.get("FileType").unwrap(), "JPEG");
        assert_eq!(results[0].fields.get("ImageWidth").unwrap(), "1920");
    }

    #[test]
    fn entries_missing_source_file_are_skipped() {
        let stdout = br#"[{"FileType":"JPEG"}]"#;
        let results = parse_exiftool_json(stdout).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn non_array_json_is_an_error() {
        assert!(parse_exiftool_json(br#"{"a":1}"#).is_err());
    }
}
