// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse()                 │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validator::validate()           │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `parser` - CLI structure and clap parsing
//! - `validator` - Security validation layer

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands, ExtractorKindArg, Medium};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

/// Flags shared by every per-stage driver command, after security
/// validation (paths canonicalized, numeric values range-checked).
#[derive(Debug, Clone)]
pub struct ValidatedCommonArgs {
    pub medium: Medium,
    pub root: Option<PathBuf>,
    pub dry_run: bool,
    pub limit: Option<usize>,
    pub batch_size: Option<usize>,
    pub page_size: Option<usize>,
    pub export_nquads: bool,
    pub target_graph: Option<String>,
    pub endpoint: Option<String>,
}

/// Validated CLI configuration.
///
/// Holds all CLI arguments after security validation: paths are
/// canonicalized (where they must already exist) and numeric values are
/// range-checked.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

/// Validated command variants, one per pipeline stage driver.
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Walk {
        common: ValidatedCommonArgs,
    },
    Hash {
        common: ValidatedCommonArgs,
        resume: bool,
    },
    BuildStructure {
        common: ValidatedCommonArgs,
    },
    Load {
        common: ValidatedCommonArgs,
        nquads_path: Option<PathBuf>,
    },
    CheckIntegrity {
        common: ValidatedCommonArgs,
    },
    ExtractMetadata {
        common: ValidatedCommonArgs,
        only: Option<ExtractorKindArg>,
    },
    Enrich {
        common: ValidatedCommonArgs,
        work_spreadsheet: Option<PathBuf>,
        with_ai_descriptions: bool,
    },
    Validate {
        common: ValidatedCommonArgs,
        csv_out: Option<PathBuf>,
    },
    Run {
        common: ValidatedCommonArgs,
        clear_first: bool,
        work_spreadsheet: Option<PathBuf>,
        with_ai_descriptions: bool,
        report_path: Option<PathBuf>,
    },
}

/// Parse and validate CLI arguments: parse with clap, then run every path
/// and numeric value through `SecureArgParser`.
///
/// # Errors
///
/// Returns `ParseError` if any validation fails.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

fn validate_common(common: parser::CommonArgs) -> Result<ValidatedCommonArgs, ParseError> {
    let root = match common.root {
        Some(path) => Some(SecureArgParser::validate_path(&path.to_string_lossy())?),
        None => None,
    };

    if let Some(batch_size) = common.batch_size {
        if batch_size == 0 {
            return Err(ParseError::InvalidValue {
                arg: "batch-size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
    }

    if let Some(page_size) = common.page_size {
        if page_size == 0 {
            return Err(ParseError::InvalidValue {
                arg: "page-size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
    }

    let target_graph = match common.target_graph {
        Some(iri) => Some(SecureArgParser::validate_iri("target-graph", &iri)?),
        None => None,
    };

    let endpoint = match common.endpoint {
        Some(url) => Some(SecureArgParser::validate_iri("endpoint", &url)?),
        None => None,
    };

    Ok(ValidatedCommonArgs {
        medium: common.medium,
        root,
        dry_run: common.dry_run,
        limit: common.limit,
        batch_size: common.batch_size,
        page_size: common.page_size,
        export_nquads: common.export_nquads,
        target_graph,
        endpoint,
    })
}

fn validate_optional_existing_path(path: &Option<PathBuf>) -> Result<Option<PathBuf>, ParseError> {
    match path {
        Some(p) => Ok(Some(SecureArgParser::validate_path(&p.to_string_lossy())?)),
        None => Ok(None),
    }
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = if let Some(ref path) = cli.config {
        Some(SecureArgParser::validate_path(&path.to_string_lossy())?)
    } else {
        None
    };

    let command = match cli.command {
        Commands::Walk { common } => ValidatedCommand::Walk {
            common: validate_common(common)?,
        },
        Commands::Hash { common, resume } => ValidatedCommand::Hash {
            common: validate_common(common)?,
            resume,
        },
        Commands::BuildStructure { common } => ValidatedCommand::BuildStructure {
            common: validate_common(common)?,
        },
        Commands::Load { common, nquads_path } => ValidatedCommand::Load {
            common: validate_common(common)?,
            nquads_path: validate_optional_existing_path(&nquads_path)?,
        },
        Commands::CheckIntegrity { common } => ValidatedCommand::CheckIntegrity {
            common: validate_common(common)?,
        },
        Commands::ExtractMetadata { common, only } => ValidatedCommand::ExtractMetadata {
            common: validate_common(common)?,
            only,
        },
        Commands::Enrich {
            common,
            work_spreadsheet,
            with_ai_descriptions,
        } => ValidatedCommand::Enrich {
            common: validate_common(common)?,
            work_spreadsheet: validate_optional_existing_path(&work_spreadsheet)?,
            with_ai_descriptions,
        },
        Commands::Validate { common, csv_out } => {
            let validated_csv_out = match csv_out {
                Some(ref path) => {
                    SecureArgParser::validate_argument(&path.to_string_lossy())?;
                    Some(path.clone())
                }
                None => None,
            };
            ValidatedCommand::Validate {
                common: validate_common(common)?,
                csv_out: validated_csv_out,
            }
        }
        Commands::Run {
            common,
            clear_first,
            work_spreadsheet,
            with_ai_descriptions,
            report_path,
        } => {
            let validated_report_path = match report_path {
                Some(ref path) => {
                    SecureArgParser::validate_argument(&path.to_string_lossy())?;
                    Some(path.clone())
                }
                None => None,
            };
            ValidatedCommand::Run {
                common: validate_common(common)?,
                clear_first,
                work_spreadsheet: validate_optional_existing_path(&work_spreadsheet)?,
                with_ai_descriptions,
                report_path: validated_report_path,
            }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn validates_run_command() {
        let cli = Cli::parse_from(["archival-pipeline", "run", "--medium", "hd"]);
        let validated = validate_cli(cli).expect("should validate");
        match validated.command {
            ValidatedCommand::Run { common, .. } => assert_eq!(common.medium, Medium::Hd),
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_batch_size() {
        let cli = Cli::parse_from(["archival-pipeline", "run", "--medium", "hd", "--batch-size", "0"]);
        assert!(matches!(validate_cli(cli), Err(ParseError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_non_uri_endpoint() {
        let cli = Cli::parse_from([
            "archival-pipeline",
            "run",
            "--medium",
            "hd",
            "--endpoint",
            "not-a-uri",
        ]);
        assert!(matches!(validate_cli(cli), Err(ParseError::InvalidValue { .. })));
    }
}
