// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The filesystem's own `st_mtime`/`st_ctime` pseudo-tool (§4.6: "the
//! filesystem's own `st_mtime`/`st_ctime` pseudo-tool" alongside DROID,
//! Tika, and ExifTool). Unlike the other three extractors, it never shells
//! out or makes an HTTP call — `std::fs::metadata` is always available, so
//! this pass never fails per-file the way a missing subprocess binary
//! would; an unreadable path is still recorded rather than aborting the
//! batch (§4.6, §7 "Extractor" error kind).
//!
//! Field names (`FileModifyDate`, `FileCreateDate`) are chosen to match
//! [`crate::application::services::graph_enricher::EQUIVALENCE_GROUPS`] so
//! the enrichment pass's `owl:sameAs` equivalence closure links this
//! tool's dates to ExifTool's/Tika's/PREMIS's own date fields without any
//! special-casing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use archival_pipeline_domain::entities::technical_metadata::ExtractorKind;
use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::services::metadata_extractor::{ExtractionResult, MetadataExtractor};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemExtractor;

impl FileSystemExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetadataExtractor for FileSystemExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::FileSystem
    }

    async fn extract(&self, batch: &[PathBuf], _workspace: &Path) -> Result<Vec<ExtractionResult>, PipelineError> {
        let mut results = Vec::with_capacity(batch.len());
        for path in batch {
            let metadata = match std::fs::metadata(path) {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };

            let mut fields = HashMap::new();
            if let Ok(modified) = metadata.modified() {
                fields.insert("FileModifyDate".to_string(), format_system_time(modified));
            }
            if let Ok(created) = metadata.created() {
                fields.insert("FileCreateDate".to_string(), format_system_time(created));
            }

            if !fields.is_empty() {
                results.push(ExtractionResult { path: path.clone(), fields, confidence: None });
            }
        }
        Ok(results)
    }
}

fn format_system_time(time: std::time::SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_modify_and_create_dates_for_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello").unwrap();

        let extractor = FileSystemExtractor::new();
        let results = extractor.extract(&[path.clone()], dir.path()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].fields.contains_key("FileModifyDate"));
    }

    #[tokio::test]
    async fn a_missing_path_is_skipped_rather_than_failing_the_batch() {
        let extractor = FileSystemExtractor::new();
        let results = extractor.extract(&[PathBuf::from("/nonexistent/path/x")], Path::new("/tmp")).await.unwrap();
        assert!(results.is_empty());
    }
}
