// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A validated, lowercase hex-encoded SHA-256 digest (§3 Fixity, §8
//! validator format regex `^[a-fA-F0-9]{64}$`).

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::PipelineError;

/// Block size HashWorker streams file contents in (§4.2).
pub const HASH_BLOCK_SIZE: usize = 8 * 1024;

/// A 64-character lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sha256Hex(String);

impl Sha256Hex {
    /// Validates and normalizes (lowercases) a hex digest string. The
    /// hash-check comparison is case-insensitive (§4.5), but the value
    /// object always stores the canonical lowercase form.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, PipelineError> {
        let raw = raw.as_ref();
        if raw.len() != 64 || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PipelineError::validation_error(format!(
                "not a valid 64-hex-digit SHA-256 digest: {raw}"
            )));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Streams `reader` through SHA-256 in [`HASH_BLOCK_SIZE`] blocks,
    /// matching HashWorker's streaming contract (§4.2).
    pub fn of_reader(mut reader: impl Read) -> Result<Self, std::io::Error> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; HASH_BLOCK_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Case-insensitive equality, mirroring the hash-check comparison rule in
/// §4.5 without requiring both sides to already be parsed `Sha256Hex`.
pub fn hashes_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert!(Sha256Hex::parse("abc123").is_err());
    }

    #[test]
    fn rejects_non_hex_chars() {
        let bad = "g".repeat(64);
        assert!(Sha256Hex::parse(bad).is_err());
    }

    #[test]
    fn normalizes_to_lowercase() {
        let upper = "A".repeat(64);
        assert_eq!(Sha256Hex::parse(&upper).unwrap().as_str(), "a".repeat(64));
    }

    #[test]
    fn of_bytes_matches_known_vector() {
        // SHA-256("") per FIPS 180-4 test vectors.
        let hash = Sha256Hex::of_bytes(b"");
        assert_eq!(hash.as_str(), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn of_reader_streams_in_blocks() {
        let data = vec![0xABu8; HASH_BLOCK_SIZE * 3 + 17];
        let by_reader = Sha256Hex::of_reader(std::io::Cursor::new(&data)).unwrap();
        let by_bytes = Sha256Hex::of_bytes(&data);
        assert_eq!(by_reader, by_bytes);
    }

    #[test]
    fn hash_comparison_is_case_insensitive() {
        assert!(hashes_match(&"AB".repeat(32), &"ab".repeat(32)));
    }
}
