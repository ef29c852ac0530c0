// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Bootstrap Module
//!
//! The bootstrap module sits **outside** the enterprise application layers
//! (domain, application, infrastructure) and provides:
//!
//! - **Entry point** - Application lifecycle management
//! - **Platform abstraction** - POSIX process/system operations, including
//!   process-group cancellation for subprocess-based metadata extractors
//! - **Signal handling** - Graceful shutdown (SIGTERM, SIGINT, SIGHUP)
//! - **Argument parsing** - Secure CLI argument validation
//! - **Error handling** - Exit code mapping
//! - **Async coordination** - Shutdown coordination and cancellation
//!
//! ## Architecture Position
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          BOOTSTRAP (This Module)            │
//! │  - Entry Point                              │
//! │  - Platform Abstraction                     │
//! │  - Signal Handling                          │
//! │  - Secure Arg Parsing                       │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │         APPLICATION LAYER                   │
//! │  - Use Cases (archival_pipeline)            │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │           DOMAIN LAYER                      │
//! │  - Entities, Value Objects, RDF model       │
//! │  - (archival_pipeline_domain)                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Separation from Enterprise Layers** — bootstrap can see into every
//!    layer; no enterprise layer depends back on bootstrap internals beyond
//!    the public types re-exported here.
//! 2. **Platform Abstraction** — OS-specific functionality lives behind the
//!    `Platform` trait, keeping `#[cfg(unix)]` out of the rest of the
//!    workspace.
//! 3. **Graceful Shutdown** — signal handlers, cancellation tokens, and a
//!    grace period with timeout enforcement.
//! 4. **Security First** — secure argument validation (path traversal and
//!    shell-metacharacter rejection) before any path reaches the pipeline.
//! 5. **Testability** — every component sits behind a trait with a no-op or
//!    capturing test double.
//!
//! ## Usage Example
//!
//! ```rust
//! use archival_pipeline_bootstrap::platform::create_platform;
//!
//! let platform = create_platform();
//! println!("Running on: {}", platform.platform_name());
//! ```
//!
//! ## Module Structure
//!
//! - `platform` - OS abstraction (POSIX)
//! - `signals` - Signal handling (SIGTERM, SIGINT, SIGHUP)
//! - `cli` - Secure argument parsing
//! - `config` - Bootstrap-phase configuration
//! - `exit_code` - Exit code mapping
//! - `logger` - Bootstrap-specific logging
//! - `shutdown` - Shutdown coordination

pub mod cli;
pub mod config;
pub mod exit_code;
pub mod logger;
pub mod platform;
pub mod shutdown;
pub mod signals;

pub use cli::{parse_and_validate, ValidatedCli, ValidatedCommand};
pub use exit_code::{map_error_to_exit_code, result_to_exit_code, ExitCode};

/// Parse and security-validate CLI arguments.
///
/// This is the main entry point for the bootstrap layer. The caller is
/// responsible for running the application logic and mapping its result to
/// an exit code with [`result_to_exit_code`].
///
/// # Errors
///
/// Returns `cli::ParseError` if CLI parsing or validation fails. Clap
/// handles `--help`/`--version` by exiting the process directly.
///
/// # Example
///
/// ```no_run
/// use archival_pipeline_bootstrap::{bootstrap_cli, result_to_exit_code};
/// use archival_pipeline_domain::PipelineError;
///
/// #[tokio::main]
/// async fn main() -> std::process::ExitCode {
///     let validated_cli = match bootstrap_cli() {
///         Ok(cli) => cli,
///         Err(e) => {
///             eprintln!("CLI error: {}", e);
///             return std::process::ExitCode::from(1);
///         }
///     };
///
///     let result = run_application(validated_cli).await;
///     std::process::ExitCode::from(result_to_exit_code(result).as_i32() as u8)
/// }
///
/// async fn run_application(
///     _cli: archival_pipeline_bootstrap::ValidatedCli,
/// ) -> Result<(), PipelineError> {
///     Ok(())
/// }
/// ```
pub fn bootstrap_cli() -> Result<ValidatedCli, cli::ParseError> {
    cli::parse_and_validate()
}
