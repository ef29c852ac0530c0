//! # Unix Platform Implementation
//!
//! POSIX-compliant implementation for Linux and macOS.
//!
//! ## Platform APIs Used
//!
//! - **System Info**: `libc::sysconf` for CPU count
//! - **Security**: `libc::geteuid` for privilege checking
//! - **Permissions**: `std::os::unix::fs::PermissionsExt`
//! - **Process groups**: `libc::setsid`/`libc::killpg` for subprocess
//!   cancellation (`MetadataOrchestrator`'s FormatIdentifier/MediaExtractor
//!   adapters)
//! - **File Sync**: `tokio::fs::File::sync_all`

use super::{Platform, PlatformError, ProcessGroup};
use async_trait::async_trait;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Unix (POSIX) platform implementation.
///
/// Supports Linux and macOS using POSIX APIs and platform-specific
/// syscalls.
pub struct UnixPlatform;

impl UnixPlatform {
    /// Create a new Unix platform instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnixPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Platform for UnixPlatform {
    fn cpu_count(&self) -> usize {
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        if count > 0 {
            count as usize
        } else {
            1
        }
    }

    fn platform_name(&self) -> &'static str {
        #[cfg(target_os = "linux")]
        return "linux";

        #[cfg(target_os = "macos")]
        return "macos";

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        return "unix";
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn is_elevated(&self) -> bool {
        unsafe { libc::geteuid() == 0 }
    }

    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        if let Ok(metadata) = std::fs::metadata(path) {
            metadata.permissions().mode() & 0o111 != 0
        } else {
            false
        }
    }

    async fn sync_file(&self, file: &tokio::fs::File) -> Result<(), PlatformError> {
        file.sync_all().await?;
        Ok(())
    }

    fn prepare_new_group(&self, command: &mut tokio::process::Command) {
        // `setsid()` in the pre-exec hook detaches the child into a new
        // session and process group, with pgid == the child's own pid.
        // Safety: the closure only calls async-signal-safe libc functions
        // between fork and exec, as required by `pre_exec`'s contract.
        unsafe {
            command.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
    }

    fn group_of(&self, child: &tokio::process::Child) -> Result<ProcessGroup, PlatformError> {
        let pid = child
            .id()
            .ok_or_else(|| PlatformError::Other("child has already been reaped".to_string()))?;
        Ok(ProcessGroup { pgid: pid as i32 })
    }

    async fn terminate_group(&self, group: ProcessGroup, grace: Duration) -> Result<(), PlatformError> {
        unsafe {
            libc::killpg(group.pgid, libc::SIGTERM);
        }

        tokio::time::sleep(grace).await;

        // killpg against an already-dead group simply returns ESRCH, which
        // we don't treat as an error: the process exited during the grace
        // period, which is the success path.
        unsafe {
            libc::killpg(group.pgid, libc::SIGKILL);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_platform_basics() {
        let platform = UnixPlatform::new();
        assert!(platform.cpu_count() >= 1);
    }

    #[test]
    fn test_platform_name() {
        let platform = UnixPlatform::new();
        let name = platform.platform_name();
        assert!(name == "linux" || name == "macos" || name == "unix");
    }

    #[test]
    fn test_temp_dir() {
        let platform = UnixPlatform::new();
        assert!(platform.temp_dir().exists());
    }

    #[test]
    fn test_is_elevated_does_not_panic() {
        let platform = UnixPlatform::new();
        let _ = platform.is_elevated();
    }

    #[tokio::test]
    async fn test_spawn_terminate_group() {
        let platform = UnixPlatform::new();
        let mut command = tokio::process::Command::new("sleep");
        command.arg("30");
        platform.prepare_new_group(&mut command);

        let mut child = command.spawn().expect("failed to spawn sleep");
        let group = platform.group_of(&child).expect("child has a pid");

        platform
            .terminate_group(group, Duration::from_millis(50))
            .await
            .expect("terminate_group should not error");

        let status = child.wait().await.expect("child should have exited");
        assert!(!status.success());
    }
}
