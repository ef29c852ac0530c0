// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Configuration
//!
//! Layered configuration (defaults < config file < environment < CLI flags),
//! built on the `config` crate the same way the teacher's
//! `infrastructure/config/config_service.rs` loads its observability
//! settings from TOML. Unlike that teacher module — which only reads
//! observability knobs — this layer also carries every external
//! collaborator endpoint the pipeline's stages depend on (§6): the triple
//! store, the three metadata extractors, and the optional AI text
//! generator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use archival_pipeline_domain::error::PipelineError;

/// Environment variable prefix for overrides, e.g. `BODI_TRIPLE_STORE__BASE_URL`.
pub const ENV_PREFIX: &str = "BODI";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripleStoreConfig {
    pub base_url: String,
    pub namespace: String,
    pub timeout_secs: u64,
}

impl Default for TripleStoreConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:9999/blazegraph".to_string(), namespace: "archive".to_string(), timeout_secs: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path to the DROID-like format identifier binary.
    pub format_identifier_binary: PathBuf,
    /// Base URL of the Tika-like content-extraction REST server.
    pub content_extractor_url: String,
    /// Path to the ExifTool-like media extractor binary.
    pub media_extractor_binary: PathBuf,
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            format_identifier_binary: PathBuf::from("droid"),
            content_extractor_url: "http://localhost:9998".to_string(),
            media_extractor_binary: PathBuf::from("exiftool"),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiDescriptionsConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiDescriptionsConfig {
    fn default() -> Self {
        Self { enabled: false, base_url: "http://localhost:8080".to_string(), model: "local-llm".to_string(), timeout_secs: 60 }
    }
}

/// Bulk-load / pagination / throttling knobs shared across stages (§4.4,
/// §4.8, §6.5 CLI flags).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// NQuadsLoader's chunk-split threshold, in bytes (§4.4 "a configured
    /// threshold, default 500 MiB"). Overlaid from the generic
    /// `--batch-size` CLI flag, which doubles as this knob for the
    /// loader the same way it doubles as a row count elsewhere.
    pub batch_size: usize,
    pub page_size: usize,
    pub flush_every: usize,
    pub query_delay_ms: u64,
    pub category_delay_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            batch_size: crate::application::services::nquads_loader::DEFAULT_MAX_CHUNK_BYTES,
            page_size: 1_000,
            flush_every: crate::application::services::metadata_orchestrator::DEFAULT_FLUSH_EVERY,
            query_delay_ms: crate::application::services::validator::DEFAULT_QUERY_DELAY.as_millis() as u64,
            category_delay_ms: crate::application::services::validator::DEFAULT_CATEGORY_DELAY.as_millis() as u64,
        }
    }
}

impl ThrottleConfig {
    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }

    pub fn category_delay(&self) -> Duration {
        Duration::from_millis(self.category_delay_ms)
    }
}

/// Top-level pipeline configuration, assembled in precedence order
/// (defaults < file < environment < CLI overrides applied by the caller).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base IRI every `IriFactory` construction is rooted at (§6.6).
    pub base_iri: String,
    /// Scratch directory used for DROID report files, N-Quads exports, and
    /// stage checkpoints.
    pub workspace_dir: PathBuf,
    pub triple_store: TripleStoreConfig,
    pub extractors: ExtractorConfig,
    pub ai_descriptions: AiDescriptionsConfig,
    pub throttle: ThrottleConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_iri: "https://example.org/bodi".to_string(),
            workspace_dir: PathBuf::from("./workspace"),
            triple_store: TripleStoreConfig::default(),
            extractors: ExtractorConfig::default(),
            ai_descriptions: AiDescriptionsConfig::default(),
            throttle: ThrottleConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads the layered configuration: built-in defaults, then an optional
    /// TOML file (if `config_path` is given and exists), then `BODI_*`
    /// environment variables. CLI flags are applied afterwards by the
    /// caller via [`PipelineConfig::apply_common_args`], since they are
    /// parsed and validated by the bootstrap layer, not this module.
    pub fn load(config_path: Option<&Path>) -> Result<Self, PipelineError> {
        let defaults = PipelineConfig::default();
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&defaults).map_err(|err| PipelineError::invalid_config(err.to_string()))?);

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(false));
        }

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let config = builder.build().map_err(|err| PipelineError::invalid_config(err.to_string()))?;
        config.try_deserialize().map_err(|err| PipelineError::invalid_config(err.to_string()))
    }

    /// Overlays CLI-supplied overrides (§6.5: `--batch-size`, `--page-size`,
    /// `--endpoint`, `--target-graph`) on top of the loaded configuration.
    /// Only `Some` fields override; everything else keeps the
    /// file/environment/default value.
    pub fn apply_common_args(&mut self, common: &archival_pipeline_bootstrap::cli::ValidatedCommonArgs) {
        if let Some(batch_size) = common.batch_size {
            self.throttle.batch_size = batch_size;
        }
        if let Some(page_size) = common.page_size {
            self.throttle.page_size = page_size;
        }
        if let Some(endpoint) = &common.endpoint {
            self.triple_store.base_url = endpoint.clone();
        }
        if let Some(graph) = &common.target_graph {
            self.base_iri = graph.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_config_file() {
        let config = PipelineConfig::load(None).unwrap();
        assert_eq!(config.triple_store.namespace, "archive");
        assert_eq!(config.throttle.batch_size, crate::application::services::nquads_loader::DEFAULT_MAX_CHUNK_BYTES);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults_rather_than_erroring() {
        let config = PipelineConfig::load(Some(Path::new("/nonexistent/bodi.toml"))).unwrap();
        assert_eq!(config.base_iri, "https://example.org/bodi");
    }
}
