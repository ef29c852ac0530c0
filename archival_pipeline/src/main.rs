// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Binary entry point: bootstrap the CLI, load the layered pipeline
//! configuration, initialize logging, and dispatch to
//! [`archival_pipeline::presentation::run`].

use std::process::ExitCode;

use archival_pipeline::infrastructure::{config::PipelineConfig, logging};
use archival_pipeline_bootstrap::{bootstrap_cli, config::BootstrapConfig, result_to_exit_code, ValidatedCommand};

#[tokio::main]
async fn main() -> ExitCode {
    let validated_cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("CLI error: {err}");
            return ExitCode::from(1);
        }
    };

    let bootstrap_config = BootstrapConfig::builder()
        .app_name("archival-pipeline")
        .log_level(if validated_cli.verbose { archival_pipeline_bootstrap::config::LogLevel::Debug } else { archival_pipeline_bootstrap::config::LogLevel::Info })
        .config_file(validated_cli.config.clone())
        .build();

    logging::init(bootstrap_config.log_level(), validated_cli.verbose);

    let common = common_args(&validated_cli.command);
    let mut config = match PipelineConfig::load(bootstrap_config.config_file().map(|p| p.as_path())) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::from(1);
        }
    };
    config.apply_common_args(common);

    let result = archival_pipeline::presentation::run(validated_cli.command, config).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "run failed");
    }
    ExitCode::from(result_to_exit_code(result).as_i32() as u8)
}

fn common_args(command: &ValidatedCommand) -> &archival_pipeline_bootstrap::cli::ValidatedCommonArgs {
    match command {
        ValidatedCommand::Walk { common }
        | ValidatedCommand::Hash { common, .. }
        | ValidatedCommand::BuildStructure { common }
        | ValidatedCommand::Load { common, .. }
        | ValidatedCommand::CheckIntegrity { common }
        | ValidatedCommand::ExtractMetadata { common, .. }
        | ValidatedCommand::Enrich { common, .. }
        | ValidatedCommand::Validate { common, .. }
        | ValidatedCommand::Run { common, .. } => common,
    }
}
