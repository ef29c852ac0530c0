// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `MetadataExtractor` port (§6.2): a single contract all three
//! external identification/metadata tools are modeled behind, so
//! `MetadataOrchestrator` (infrastructure/application layer) never branches
//! on which concrete tool it's talking to.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::entities::ExtractorKind;
use crate::error::PipelineError;

/// One file's extracted fields from a single extractor invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub path: PathBuf,
    pub fields: HashMap<String, String>,
    /// Confidence number from the tool, when it reports one (§6.2).
    pub confidence: Option<f64>,
}

/// Given a list of absolute file paths plus a scoped workspace directory,
/// produce one [`ExtractionResult`] per path (§6.2). Implementations own
/// their own subprocess/REST-client lifecycle; the port only promises the
/// input/output contract.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    fn kind(&self) -> ExtractorKind;

    /// Extracts metadata for every path in `batch`, using `workspace` as
    /// scratch space (format identifiers) or nothing at all (REST/CLI
    /// extractors that need no scratch space may ignore it).
    async fn extract(&self, batch: &[PathBuf], workspace: &Path) -> Result<Vec<ExtractionResult>, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_result_is_plain_data() {
        let mut fields = HashMap::new();
        fields.insert("MIME_TYPE".to_string(), "image/jpeg".to_string());
        let result = ExtractionResult { path: PathBuf::from("/a/b.jpg"), fields, confidence: Some(0.92) };
        assert_eq!(result.fields.get("MIME_TYPE").unwrap(), "image/jpeg");
    }
}
