// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Platform Abstraction Module
//!
//! OS-specific functionality the pipeline needs, isolated behind a trait so
//! the rest of the workspace never reaches for `#[cfg(unix)]` directly.
//!
//! ## Architecture Pattern
//!
//! Following hexagonal architecture principles:
//! - **Interface**: `Platform` trait defines the contract
//! - **Implementation**: `UnixPlatform` is the only supported target. The
//!   pipeline runs as a POSIX batch job against local disks and archival
//!   media, and the one place platform code matters beyond basic system
//!   info — subprocess process-group cancellation for
//!   `MetadataOrchestrator`'s FormatIdentifier/MediaExtractor adapters — has
//!   no Windows equivalent worth maintaining.
//!
//! ## Design Philosophy
//!
//! The bootstrap module sits OUTSIDE the enterprise application layers, so
//! it can access platform-specific APIs directly. This abstraction:
//!
//! 1. **Isolates** OS-specific code to one module
//! 2. **Enables** testing via trait mocking
//! 3. **Avoids** scattered conditional compilation in the pipeline crate
//!
//! ## Usage
//!
//! ```rust
//! use archival_pipeline_bootstrap::platform::create_platform;
//!
//! let platform = create_platform();
//! println!("Running on: {}", platform.platform_name());
//! println!("CPU cores: {}", platform.cpu_count());
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod unix;

pub use unix::UnixPlatform;

/// Platform-specific errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feature not supported on this platform.
    #[error("Not supported on this platform: {0}")]
    NotSupported(String),

    /// Generic platform error.
    #[error("Platform error: {0}")]
    Other(String),
}

/// Handle to a process group spawned via [`Platform::prepare_new_group`],
/// carrying just enough state to terminate the whole group later.
///
/// Subprocess-based metadata extractors (DROID-like format identification,
/// ExifTool-like media extraction — see
/// `archival_pipeline::application::services::metadata_orchestrator`) are
/// placed in their own process group at spawn time so a cancelled
/// extraction can't leave orphaned grandchild processes behind.
#[derive(Debug, Clone, Copy)]
pub struct ProcessGroup {
    pgid: i32,
}

impl ProcessGroup {
    /// The process group ID, useful for logging.
    pub fn pgid(&self) -> i32 {
        self.pgid
    }
}

/// Platform abstraction trait for OS-specific operations.
///
/// ## Design Principles
///
/// - **Stateless**: implementations hold no mutable state
/// - **Async-aware**: file and process operations are async-compatible
/// - **Error-handling**: all fallible operations return `Result`
#[async_trait]
pub trait Platform: Send + Sync {
    /// Number of logical CPU cores available to the process. Used to size
    /// the HashWorker pool (`min(4, cpu_count)`, SPEC_FULL §5).
    fn cpu_count(&self) -> usize;

    /// Platform identifier: "linux", "macos", or "unix" as a fallback.
    fn platform_name(&self) -> &'static str;

    /// Platform-specific temporary directory, used for N-Quads chunk
    /// staging when no output directory is configured.
    fn temp_dir(&self) -> PathBuf;

    /// `true` if running with elevated privileges (effective UID 0).
    fn is_elevated(&self) -> bool;

    /// `true` if `path` points to an executable file.
    fn is_executable(&self, path: &Path) -> bool;

    /// Flush file buffers to disk.
    async fn sync_file(&self, file: &tokio::fs::File) -> Result<(), PlatformError>;

    /// Place a [`tokio::process::Command`] into a fresh process group
    /// before it is spawned.
    fn prepare_new_group(&self, command: &mut tokio::process::Command);

    /// Capture the process group ID of a just-spawned child, previously
    /// prepared with [`Platform::prepare_new_group`].
    fn group_of(&self, child: &tokio::process::Child) -> Result<ProcessGroup, PlatformError>;

    /// Send SIGTERM to the whole process group, wait up to `grace`, then
    /// send SIGKILL to any survivors.
    async fn terminate_group(&self, group: ProcessGroup, grace: Duration) -> Result<(), PlatformError>;
}

/// Create the platform-specific implementation.
pub fn create_platform() -> Box<dyn Platform> {
    Box::new(UnixPlatform::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_platform() {
        let platform = create_platform();
        assert!(platform.cpu_count() >= 1);
        assert!(!platform.platform_name().is_empty());
    }
}
