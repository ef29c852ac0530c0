// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Secure Argument Validation
//!
//! Security-first validation for command-line arguments, applied after
//! `clap` has done structural parsing. Paths that reach this pipeline are
//! walked and hashed, and eventually used in SPARQL queries sent to a
//! triple store over HTTP, so defense in depth against path traversal and
//! shell-metacharacter injection is worth the extra layer even though clap
//! itself never shells out.

use std::path::{Path, PathBuf};
use thiserror::Error;

const MAX_ARG_COUNT: usize = 100;
const MAX_ARG_LENGTH: usize = 1000;
const MAX_PATH_LENGTH: usize = 4096;

const DANGEROUS_PATTERNS: &[&str] = &["..", "~", "$", "`", ";", "&", "|", ">", "<", "\n", "\r", "\0"];
const PROTECTED_DIRS: &[&str] = &["/etc", "/bin", "/sbin", "/usr/bin", "/usr/sbin", "/boot", "/sys", "/proc", "/dev"];

/// Errors raised while validating CLI arguments.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Too many arguments were supplied.
    #[error("too many arguments (max {MAX_ARG_COUNT})")]
    TooManyArguments,

    /// An argument exceeded the maximum allowed length.
    #[error("argument too long (max {MAX_ARG_LENGTH} characters): {0}")]
    ArgumentTooLong(String),

    /// A dangerous pattern was found in an argument.
    #[error("dangerous pattern detected in argument: {pattern} in {arg}")]
    DangerousPattern { pattern: String, arg: String },

    /// A path exceeded the maximum allowed length.
    #[error("path exceeds maximum length (max {MAX_PATH_LENGTH})")]
    PathTooLong,

    /// A path resolved into a protected system directory.
    #[error("access to protected system directory denied: {0}")]
    ProtectedDirectory(String),

    /// A path does not exist.
    #[error("path does not exist: {0}")]
    PathNotFound(String),

    /// A path is otherwise invalid.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A required argument is missing.
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// An argument's value failed validation.
    #[error("invalid argument value for {arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Security-first argument and path validator.
pub struct SecureArgParser;

impl SecureArgParser {
    /// Validate the total argument count for the process.
    pub fn validate_count(args: &[String]) -> Result<(), ParseError> {
        if args.len() > MAX_ARG_COUNT {
            return Err(ParseError::TooManyArguments);
        }
        Ok(())
    }

    /// Validate a single argument for length and dangerous patterns.
    pub fn validate_argument(arg: &str) -> Result<(), ParseError> {
        if arg.len() > MAX_ARG_LENGTH {
            return Err(ParseError::ArgumentTooLong(arg.chars().take(50).collect::<String>() + "..."));
        }

        for pattern in DANGEROUS_PATTERNS {
            if arg.contains(pattern) {
                return Err(ParseError::DangerousPattern {
                    pattern: pattern.to_string(),
                    arg: arg.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Validate and canonicalize a file path.
    ///
    /// # Security checks
    ///
    /// 1. Length and dangerous-pattern validation
    /// 2. Canonicalization (resolves `..`, symlinks)
    /// 3. Protected system directory check
    pub fn validate_path(path: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(path).map_err(|e| match e {
            ParseError::ArgumentTooLong(_) => ParseError::InvalidPath(format!("path too long: {}", path)),
            ParseError::DangerousPattern { pattern, .. } => {
                ParseError::InvalidPath(format!("path contains dangerous pattern '{}': {}", pattern, path))
            }
            other => other,
        })?;

        let path_obj = Path::new(path);

        let canonical = path_obj.canonicalize().map_err(|e| {
            if !path_obj.exists() {
                ParseError::PathNotFound(path.to_string())
            } else {
                ParseError::InvalidPath(format!("{}: {}", path, e))
            }
        })?;

        if canonical.to_string_lossy().len() > MAX_PATH_LENGTH {
            return Err(ParseError::PathTooLong);
        }

        for protected in PROTECTED_DIRS {
            if canonical.starts_with(protected) {
                return Err(ParseError::ProtectedDirectory(canonical.display().to_string()));
            }
        }

        Ok(canonical)
    }

    /// Like [`Self::validate_path`] but for a path that does not need to
    /// already exist (e.g. a configured output directory that will be
    /// created).
    pub fn validate_path_allow_missing(path: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(path).map_err(|e| match e {
            ParseError::ArgumentTooLong(_) => ParseError::InvalidPath(format!("path too long: {}", path)),
            ParseError::DangerousPattern { pattern, .. } => {
                ParseError::InvalidPath(format!("path contains dangerous pattern '{}': {}", pattern, path))
            }
            other => other,
        })?;

        let path_obj = Path::new(path);
        if path_obj.to_string_lossy().len() > MAX_PATH_LENGTH {
            return Err(ParseError::PathTooLong);
        }

        let probe = path_obj.canonicalize().unwrap_or_else(|_| path_obj.to_path_buf());
        for protected in PROTECTED_DIRS {
            if probe.starts_with(protected) {
                return Err(ParseError::ProtectedDirectory(probe.display().to_string()));
            }
        }

        Ok(path_obj.to_path_buf())
    }

    /// Validate an optional path (`None` passes through unchanged).
    pub fn validate_optional_path(path: Option<&str>) -> Result<Option<PathBuf>, ParseError> {
        match path {
            Some(p) => Self::validate_path(p).map(Some),
            None => Ok(None),
        }
    }

    /// Validate a numeric argument against an optional min/max range.
    pub fn validate_number<T>(arg_name: &str, value: &str, min: Option<T>, max: Option<T>) -> Result<T, ParseError>
    where
        T: std::str::FromStr + PartialOrd + std::fmt::Display,
    {
        Self::validate_argument(value)?;

        let num = value.parse::<T>().map_err(|_| ParseError::InvalidValue {
            arg: arg_name.to_string(),
            reason: format!("not a valid number: {}", value),
        })?;

        if let Some(min_val) = min {
            if num < min_val {
                return Err(ParseError::InvalidValue {
                    arg: arg_name.to_string(),
                    reason: format!("value {} is less than minimum {}", value, min_val),
                });
            }
        }

        if let Some(max_val) = max {
            if num > max_val {
                return Err(ParseError::InvalidValue {
                    arg: arg_name.to_string(),
                    reason: format!("value {} is greater than maximum {}", value, max_val),
                });
            }
        }

        Ok(num)
    }

    /// Validate an IRI-shaped string (used for `--target-graph`,
    /// `--endpoint`). Only checks for dangerous shell patterns and gross
    /// shape (must contain `://` or start with `http`); full IRI grammar
    /// validation happens in the domain's `rdf` module when the value is
    /// wrapped into a `GraphIri`.
    pub fn validate_iri(arg_name: &str, value: &str) -> Result<String, ParseError> {
        Self::validate_argument(value)?;
        if !value.contains("://") {
            return Err(ParseError::InvalidValue {
                arg: arg_name.to_string(),
                reason: format!("not a URI: {}", value),
            });
        }
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod argument_validation {
        use super::*;

        #[test]
        fn accepts_safe_arguments() {
            assert!(SecureArgParser::validate_argument("safe-arg").is_ok());
            assert!(SecureArgParser::validate_argument("file.txt").is_ok());
            assert!(SecureArgParser::validate_argument("path/to/file").is_ok());
        }

        #[test]
        fn rejects_too_long_arguments() {
            let long_arg = "a".repeat(MAX_ARG_LENGTH + 1);
            assert!(matches!(
                SecureArgParser::validate_argument(&long_arg),
                Err(ParseError::ArgumentTooLong(_))
            ));
        }

        #[test]
        fn detects_dangerous_patterns() {
            let dangerous = vec![
                "../etc/passwd",
                "~/.ssh/id_rsa",
                "$(whoami)",
                "`ls`",
                "file;rm -rf /",
                "file&background",
                "file|pipe",
                "file>output",
                "file<input",
                "file\nwith\nnewlines",
            ];

            for arg in dangerous {
                assert!(
                    matches!(SecureArgParser::validate_argument(arg), Err(ParseError::DangerousPattern { .. })),
                    "failed to detect dangerous pattern in: {}",
                    arg
                );
            }
        }
    }

    mod number_validation {
        use super::*;

        #[test]
        fn validates_valid_numbers() {
            let result = SecureArgParser::validate_number::<usize>("limit", "8", Some(1), Some(16));
            assert_eq!(result.unwrap(), 8);
        }

        #[test]
        fn rejects_invalid_numbers() {
            let result = SecureArgParser::validate_number::<usize>("limit", "abc", None, None);
            assert!(matches!(result, Err(ParseError::InvalidValue { .. })));
        }

        #[test]
        fn enforces_range_constraints() {
            let result = SecureArgParser::validate_number::<usize>("limit", "100", Some(1), Some(16));
            assert!(matches!(result, Err(ParseError::InvalidValue { .. })));

            let result = SecureArgParser::validate_number::<usize>("limit", "0", Some(1), Some(16));
            assert!(matches!(result, Err(ParseError::InvalidValue { .. })));
        }
    }

    mod iri_validation {
        use super::*;

        #[test]
        fn accepts_http_uris() {
            assert!(SecureArgParser::validate_iri("endpoint", "http://localhost:9999/sparql").is_ok());
        }

        #[test]
        fn rejects_non_uri() {
            assert!(matches!(
                SecureArgParser::validate_iri("endpoint", "localhost:9999"),
                Err(ParseError::InvalidValue { .. })
            ));
        }
    }

    mod count_validation {
        use super::*;

        #[test]
        fn rejects_too_many_arguments() {
            let args = vec!["arg".to_string(); MAX_ARG_COUNT + 1];
            assert!(matches!(SecureArgParser::validate_count(&args), Err(ParseError::TooManyArguments)));
        }
    }
}
