// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Instantiation, Location, and Fixity entities (§3).

use crate::value_objects::archival_id::ArchivalId;
use crate::value_objects::sha256_hex::Sha256Hex;

/// The physical embodiment of a Record or RecordSet: one per non-root node
/// (§3 invariant 1), carrying its filesystem path and hierarchy depth, and
/// — for files — a [`Fixity`].
///
/// `redacted` is always `false` at construction time: the core never
/// decides redaction itself, an archivist review process flips it later
/// via an out-of-band SPARQL update against the already-loaded graph
/// (§3.11). StructureBuilder still emits the flag for every Instantiation
/// so the predicate is always present for that review process to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instantiation {
    pub owner: ArchivalId,
    pub location: Location,
    pub depth: u32,
    pub fixity: Option<Fixity>,
    pub redacted: bool,
}

impl Instantiation {
    pub fn new(owner: ArchivalId, location: Location, depth: u32, fixity: Option<Fixity>) -> Self {
        Self { owner, location, depth, fixity, redacted: false }
    }
}

/// A filesystem path label, always starting with `/` (§3, §4.3: "location
/// label (relative path prefixed with `/`)").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(String);

impl Location {
    /// Builds a `Location` from a path relative to the medium's base
    /// directory, prefixing it with `/` if the caller didn't already.
    pub fn from_relative_path(relative: impl AsRef<str>) -> Self {
        let relative = relative.as_ref();
        if relative.starts_with('/') {
            Self(relative.to_string())
        } else {
            Self(format!("/{relative}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The SHA-256 fixity value of a file (§3), always a 64-hex-lowercase
/// digest backed by [`Sha256Hex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixity {
    pub hash: Sha256Hex,
}

impl Fixity {
    pub fn new(hash: Sha256Hex) -> Self {
        Self { hash }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_gets_a_leading_slash() {
        assert_eq!(Location::from_relative_path("a/b.txt").as_str(), "/a/b.txt");
        assert_eq!(Location::from_relative_path("/already.txt").as_str(), "/already.txt");
    }
}
