// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A hierarchical error type for the archival pipeline domain. Stages never
//! propagate exceptions across each other (the driver collects a structured
//! `{success, counts, errors[]}` per stage, see `application::report`); this
//! enum is for the error *inside* a single operation, and for the small set
//! of conditions the bootstrap layer must map to a specific exit code.

use thiserror::Error;

/// Domain-specific errors for the archival ingest pipeline.
///
/// Variants are grouped by the error kinds in §7: walker, hashing, loader,
/// extractor subprocess, SPARQL, integrity, and fatal (startup) errors.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// FSWalker: permission denied, broken symlink, or cross-device
    /// boundary encountered while traversing a path. The walk continues;
    /// this error is recorded in the per-path error summary, not returned
    /// to the caller.
    #[error("walker error at {path}: {reason}")]
    WalkerError { path: String, reason: String },

    /// HashWorker: I/O error reading a file's contents. Recorded per file
    /// in the hash inventory's `error` field; the worker moves on.
    #[error("hashing error for {path}: {reason}")]
    HashingError { path: String, reason: String },

    /// NQuadsLoader: HTTP status >= 400, timeout, or connection refused
    /// while uploading a chunk or issuing a SPARQL UPDATE.
    #[error("loader error: {0}")]
    LoaderError(String),

    /// MetadataOrchestrator: external-tool subprocess failed (non-zero
    /// exit, stderr parse failure, CSV parse error) or timed out.
    #[error("extractor '{extractor}' failed: {reason}")]
    ExtractorError { extractor: String, reason: String },

    /// SPARQL query or update failed: HTTP >= 400, invalid JSON response,
    /// or boolean-result parse failure.
    #[error("SPARQL error: {0}")]
    SparqlError(String),

    /// IntegrityChecker: JSON inventory and graph contents diverge in a
    /// way that does not amount to hash corruption (missing-in-graph,
    /// extra-in-graph, corrupted-JSON entries).
    #[error("integrity check failed: {0}")]
    IntegrityError(String),

    /// IntegrityChecker (hash check) or post-metadata consistency check:
    /// a fixity value recorded in the graph or the inventory does not
    /// match the recomputed SHA-256. Maps to exit code 2.
    #[error("hash corruption detected: {message}")]
    HashCorruption { message: String },

    /// Fatal/startup: required configuration is missing or a mandatory
    /// external tool is absent. The driver aborts before starting work.
    #[error("configuration error: {0}")]
    InvalidConfiguration(String),

    /// A value object's construction invariant was violated (malformed
    /// IRI, wrong-length hash, negative depth, etc).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Serialization/deserialization failure (inventory JSON, checkpoint
    /// JSON, URI counters JSON).
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Generic I/O failure not already categorized above (workspace
    /// creation/cleanup, report file writes).
    #[error("I/O error: {0}")]
    IoError(String),

    /// Operation exceeded its configured timeout.
    #[error("timeout error: {0}")]
    TimeoutError(String),

    /// Run cancelled by the user (SIGINT/SIGTERM) or by a parent
    /// cancellation token. Maps to exit code 130.
    #[error("cancelled")]
    Cancelled,

    /// Unexpected internal failure that does not fit another category.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl PipelineError {
    /// Creates a new walker error.
    pub fn walker_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WalkerError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new hashing error.
    pub fn hashing_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::HashingError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new loader error.
    pub fn loader_error(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }

    /// Creates a new extractor-subprocess error.
    pub fn extractor_error(extractor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExtractorError {
            extractor: extractor.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new SPARQL error.
    pub fn sparql_error(msg: impl Into<String>) -> Self {
        Self::SparqlError(msg.into())
    }

    /// Creates a new integrity error.
    pub fn integrity_error(msg: impl Into<String>) -> Self {
        Self::IntegrityError(msg.into())
    }

    /// Creates a new hash-corruption error.
    pub fn hash_corruption(message: impl Into<String>) -> Self {
        Self::HashCorruption { message: message.into() }
    }

    /// Creates a new configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new validation error.
    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Creates a new internal error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// `true` if retrying the same operation might succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::TimeoutError(_) | PipelineError::LoaderError(_) | PipelineError::IoError(_)
        )
    }

    /// Coarse category string, used for structured logging.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::WalkerError { .. } => "walker",
            PipelineError::HashingError { .. } => "hashing",
            PipelineError::LoaderError(_) => "loader",
            PipelineError::ExtractorError { .. } => "extractor",
            PipelineError::SparqlError(_) => "sparql",
            PipelineError::IntegrityError(_) => "integrity",
            PipelineError::HashCorruption { .. } => "integrity",
            PipelineError::InvalidConfiguration(_) => "configuration",
            PipelineError::ValidationError(_) => "validation",
            PipelineError::SerializationError(_) => "serialization",
            PipelineError::IoError(_) => "io",
            PipelineError::TimeoutError(_) => "timeout",
            PipelineError::Cancelled => "cancellation",
            PipelineError::InternalError(_) => "internal",
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_maps_hash_corruption_to_integrity() {
        let err = PipelineError::hash_corruption("mismatch");
        assert_eq!(err.category(), "integrity");
    }

    #[test]
    fn cancelled_has_no_payload() {
        let err = PipelineError::Cancelled;
        assert_eq!(err.to_string(), "cancelled");
    }

    #[test]
    fn loader_and_timeout_errors_are_recoverable() {
        assert!(PipelineError::loader_error("connection refused").is_recoverable());
        assert!(PipelineError::TimeoutError("sparql query".into()).is_recoverable());
        assert!(!PipelineError::hash_corruption("x").is_recoverable());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PipelineError = io_err.into();
        assert_eq!(err.category(), "io");
    }
}
