// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! The pipeline uses a small, fixed exit-code contract rather than the full
//! BSD `sysexits.h` range: operators running this as a cron/batch job only
//! need to distinguish "succeeded", "failed", "hash corruption detected",
//! and "interrupted by the user".
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | Success |
//! | 1 | Generic failure, or a critical pipeline stage failed |
//! | 2 | Hash/fixity corruption detected during integrity checking |
//! | 130 | Interrupted by the user (SIGINT/Ctrl-C) |

use std::fmt;

use archival_pipeline_domain::PipelineError;

/// Process exit codes for the archival pipeline binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination.
    #[default]
    Success = 0,

    /// Generic failure, or a critical (non-verification) pipeline stage
    /// failed.
    Error = 1,

    /// Hash/fixity corruption was detected while reconciling counts and
    /// hashes against the triple store.
    HashCorruption = 2,

    /// Interrupted by the user (SIGINT/Ctrl-C).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert to `i32` for use with `std::process::exit`.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a `PipelineError` to its exit code via
    /// [`archival_pipeline_domain::PipelineError::category`].
    pub fn from_error(error: &PipelineError) -> Self {
        match error {
            PipelineError::HashCorruption { .. } => ExitCode::HashCorruption,
            PipelineError::Cancelled => ExitCode::Interrupted,
            _ => ExitCode::Error,
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "Error",
            ExitCode::HashCorruption => "Hash corruption detected",
            ExitCode::Interrupted => "Interrupted by user",
        }
    }

    /// `true` if this is the success code.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Map a `Result` from running the pipeline to a process `ExitCode`.
pub fn map_error_to_exit_code(error: &PipelineError) -> ExitCode {
    ExitCode::from_error(error)
}

/// Map a pipeline run's `Result` straight to an `ExitCode`.
pub fn result_to_exit_code<T>(result: Result<T, PipelineError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::Success,
        Err(e) => map_error_to_exit_code(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Error.as_i32(), 1);
        assert_eq!(ExitCode::HashCorruption.as_i32(), 2);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_is_success() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::Error.is_success());
    }

    #[test]
    fn test_from_error_hash_corruption() {
        let err = PipelineError::hash_corruption("quad count mismatch");
        assert_eq!(ExitCode::from_error(&err), ExitCode::HashCorruption);
    }

    #[test]
    fn test_from_error_cancelled() {
        assert_eq!(ExitCode::from_error(&PipelineError::Cancelled), ExitCode::Interrupted);
    }

    #[test]
    fn test_result_to_exit_code_success() {
        let result: Result<(), PipelineError> = Ok(());
        assert_eq!(result_to_exit_code(result), ExitCode::Success);
    }
}
