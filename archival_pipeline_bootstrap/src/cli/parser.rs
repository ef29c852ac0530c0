// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface parsing using clap.
//!
//! This module defines the CLI structure and handles argument parsing.
//! Security validation happens in the [`super::validator`] module after
//! parsing.
//!
//! Every subcommand is a "per-tool driver" onto one pipeline stage
//! (FSWalker, HashWorker, StructureBuilder, NQuadsLoader, IntegrityChecker,
//! MetadataOrchestrator, GraphEnricher, Validator) plus a `run` command
//! that sequences all of them (PipelineDriver). All share the same medium
//! selector and throttling/scope flags.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Which physical source medium a pipeline run targets.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[clap(rename_all = "lowercase")]
pub enum Medium {
    /// Internal hard disk.
    Hd,
    /// External hard disk.
    Hdexternal,
    /// Floppy disk set.
    Floppy,
}

/// Main CLI structure.
#[derive(Parser, Debug, Clone)]
#[command(name = "archival-pipeline")]
#[command(about = concat!("Archival ingest pipeline v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path (TOML). Overrides defaults; overridden by
    /// environment variables and CLI flags (see `infrastructure::config`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Flags shared by every per-stage driver subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Which source medium to operate on.
    #[arg(long, value_enum)]
    pub medium: Medium,

    /// Root directory to walk / was walked for this medium (only required
    /// by stages that read from disk: walk, hash, build-structure).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Report what would happen without performing writes (SPARQL UPDATE /
    /// bulk-load / filesystem writes are skipped).
    #[arg(long)]
    pub dry_run: bool,

    /// Process at most N items (files, chunks, or rows depending on
    /// stage); unset means no limit.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Chunk size (bytes) for N-Quads bulk-load batching.
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Page size for result-set pagination against the triple store.
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Write the generated N-Quads to disk alongside (or instead of)
    /// loading them into the triple store.
    #[arg(long)]
    pub export_nquads: bool,

    /// Named graph IRI this stage's writes target. Defaults to the
    /// stage's own convention (see §6.6) if unset.
    #[arg(long)]
    pub target_graph: Option<String>,

    /// Triple store SPARQL endpoint base URL.
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// CLI subcommands: one per pipeline stage, plus `run` for the full
/// sequence.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Walk the filesystem hierarchy for a medium and record the
    /// directory/file structure (FSWalker).
    Walk {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Compute SHA-256 fixity hashes for every file discovered by `walk`
    /// (HashWorker).
    Hash {
        #[command(flatten)]
        common: CommonArgs,

        /// Resume from a previous partial hash inventory instead of
        /// starting over.
        #[arg(long)]
        resume: bool,
    },

    /// Assign archival IDs and emit the RiC-O structure graph
    /// (StructureBuilder).
    BuildStructure {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Bulk-load generated N-Quads into the triple store (NQuadsLoader).
    Load {
        #[command(flatten)]
        common: CommonArgs,

        /// Path to an N-Quads file or directory of chunk files to load
        /// (if not generating them in this invocation).
        #[arg(long)]
        nquads_path: Option<PathBuf>,
    },

    /// Reconcile file counts and hashes between the local inventory and
    /// the loaded graph (IntegrityChecker).
    CheckIntegrity {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Run the format identifier, content extractor, and media extractor
    /// against loaded Instantiations (MetadataOrchestrator).
    ExtractMetadata {
        #[command(flatten)]
        common: CommonArgs,

        /// Restrict to a single extractor kind.
        #[arg(long, value_enum)]
        only: Option<ExtractorKindArg>,
    },

    /// Run the post-load SPARQL enrichment passes (GraphEnricher):
    /// hash-duplicate cliques, date normalization, titles, technical
    /// metadata classification, MIME typing, Work linking, and
    /// (optionally) AI descriptions.
    Enrich {
        #[command(flatten)]
        common: CommonArgs,

        /// Path to the Work-relation CSV spreadsheet (§6.7). Omit to skip
        /// the Work-linking pass.
        #[arg(long)]
        work_spreadsheet: Option<PathBuf>,

        /// Enable the AI technical-description pass. Requires a
        /// configured `TextGenerator` endpoint.
        #[arg(long)]
        with_ai_descriptions: bool,
    },

    /// Run the fixed battery of validation SPARQL queries and optionally
    /// export results as CSV (Validator).
    Validate {
        #[command(flatten)]
        common: CommonArgs,

        /// Directory to write CSV export files into.
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },

    /// Run every stage above in sequence for the given medium
    /// (PipelineDriver), producing a final JSON stage report.
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Clear (drop and recreate) the triple store namespace before
        /// running.
        #[arg(long)]
        clear_first: bool,

        /// Path to the Work-relation CSV spreadsheet (§6.7).
        #[arg(long)]
        work_spreadsheet: Option<PathBuf>,

        /// Enable the AI technical-description pass.
        #[arg(long)]
        with_ai_descriptions: bool,

        /// Where to write the JSON stage report.
        #[arg(long)]
        report_path: Option<PathBuf>,
    },
}

/// Clap-facing mirror of `archival_pipeline_domain::services::ExtractorKind`,
/// kept separate so the bootstrap crate doesn't need a domain-crate
/// dependency just to expose `--only`. Converted by the pipeline crate.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[clap(rename_all = "kebab-case")]
pub enum ExtractorKindArg {
    /// DROID-like subprocess format identifier.
    FormatIdentifier,
    /// Tika-like REST content extractor.
    ContentExtractor,
    /// ExifTool-like CLI media extractor.
    MediaExtractor,
}

/// Parse CLI arguments from `std::env::args()`.
///
/// # Panics
///
/// Clap exits the process with a usage message if parsing fails; this
/// function only returns on success.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_walk_command() {
        let cli = Cli::parse_from([
            "archival-pipeline",
            "walk",
            "--medium",
            "hd",
            "--root",
            "/mnt/hd",
        ]);
        match cli.command {
            Commands::Walk { common } => {
                assert_eq!(common.medium, Medium::Hd);
                assert_eq!(common.root, Some(PathBuf::from("/mnt/hd")));
            }
            other => panic!("expected Walk, got {:?}", other),
        }
    }

    #[test]
    fn parses_run_command_with_flags() {
        let cli = Cli::parse_from([
            "archival-pipeline",
            "run",
            "--medium",
            "floppy",
            "--dry-run",
            "--limit",
            "10",
            "--clear-first",
        ]);
        match cli.command {
            Commands::Run { common, clear_first, .. } => {
                assert_eq!(common.medium, Medium::Floppy);
                assert!(common.dry_run);
                assert_eq!(common.limit, Some(10));
                assert!(clear_first);
            }
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn rejects_missing_medium() {
        let result = Cli::try_parse_from(["archival-pipeline", "walk"]);
        assert!(result.is_err());
    }
}
