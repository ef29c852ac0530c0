// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Tika-like content extractor (§4.6, §6.2): a REST adapter that PUTs one
//! file at a time to a running Apache-Tika-compatible server's
//! `/meta` endpoint and reads back a flat JSON metadata map. Grounded on
//! `original_source/phase#2` Tika HTTP usage and the teacher's `reqwest`
//! REST-adapter pattern.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use archival_pipeline_domain::entities::technical_metadata::ExtractorKind;
use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::services::metadata_extractor::{ExtractionResult, MetadataExtractor};

pub struct ContentExtractorAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl ContentExtractorAdapter {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|err| PipelineError::invalid_config(err.to_string()))?;
        Ok(Self { client, base_url: base_url.into() })
    }
}

#[async_trait]
impl MetadataExtractor for ContentExtractorAdapter {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::ContentExtractor
    }

    async fn extract(&self, batch: &[PathBuf], _workspace: &Path) -> Result<Vec<ExtractionResult>, PipelineError> {
        let mut results = Vec::with_capacity(batch.len());
        for path in batch {
            match self.extract_one(path).await {
                Ok(result) => results.push(result),
                Err(err) => {
                    return Err(PipelineError::extractor_error("Apache Tika", format!("{}: {err}", path.display())));
                }
            }
        }
        Ok(results)
    }
}

impl ContentExtractorAdapter {
    async fn extract_one(&self, path: &Path) -> Result<ExtractionResult, PipelineError> {
        let body = tokio::fs::read(path).await.map_err(|err| PipelineError::extractor_error("Apache Tika", err.to_string()))?;
        let response = self
            .client
            .put(format!("{}/meta", self.base_url))
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| PipelineError::extractor_error("Apache Tika", err.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::extractor_error("Apache Tika", format!("HTTP {}", response.status())));
        }
        let json: JsonValue = response.json().await.map_err(|err| PipelineError::extractor_error("Apache Tika", err.to_string()))?;
        Ok(ExtractionResult { path: path.to_path_buf(), fields: flatten_metadata(&json), confidence: None })
    }
}

/// Tika's `/meta` JSON is a flat object whose values may be scalars or
/// arrays (repeated headers); arrays are joined with `"; "` to keep the
/// field a single string per §6.2's `(field, value)` tuple contract.
fn flatten_metadata(json: &JsonValue) -> std::collections::HashMap<String, String> {
    let mut fields = std::collections::HashMap::new();
    let JsonValue::Object(map) = json else {
        return fields;
    };
    for (key, value) in map {
        let rendered = match value {
            JsonValue::String(s) => s.clone(),
            JsonValue::Array(items) => items.iter().filter_map(|v| v.as_str()).collect::<Vec<_>>().join("; "),
            other => other.to_string(),
        };
        if !rendered.is_empty() {
            fields.insert(key.clone(), rendered);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_scalar_and_array_fields() {
        let json = serde_json::json!({
            "Content-Type": "image/jpeg",
            "dc:creator": ["Alice", "Bob"],
            "dc:title": ""
        });
        let fields = flatten_metadata(&json);
        assert_eq!(fields.get("Content-Type").unwrap(), "image/jpeg");
        assert_eq!(fields.get("dc:creator").unwrap(), "Alice; Bob");
        assert!(!fields.contains_key("dc:title"), "empty fields are dropped");
    }

    #[test]
    fn non_object_json_yields_no_fields() {
        let fields = flatten_metadata(&serde_json::json!([1, 2, 3]));
        assert!(fields.is_empty());
    }
}
