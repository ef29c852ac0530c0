// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The three storage media the pipeline ingests (§1, §6.5 CLI selector
//! `floppy|hd|hdexternal`).

use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;
use crate::value_objects::archival_id::ArchivalId;

/// One of the three top-level source trees (§3 invariant 8, glossary
/// "Medium"). Each medium maps to exactly one of the three predefined root
/// IDs and carries its own StorageLocation/StorageMedium pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Medium {
    /// Internal hard disk (`RS1_RS1`).
    HardDisk,
    /// External hard disk (`RS1_RS2`).
    HardDiskExternal,
    /// Floppy disk collection (`RS1_RS3`).
    Floppy,
}

impl Medium {
    /// All three media, in root-ordinal order.
    pub const ALL: [Medium; 3] = [Medium::HardDisk, Medium::HardDiskExternal, Medium::Floppy];

    /// CLI selector token (§6.5: `floppy|hd|hdexternal`).
    pub fn cli_token(self) -> &'static str {
        match self {
            Medium::HardDisk => "hd",
            Medium::HardDiskExternal => "hdexternal",
            Medium::Floppy => "floppy",
        }
    }

    /// The predefined root archival ID for this medium (§3 invariant 8).
    pub fn root_id(self) -> ArchivalId {
        let raw = match self {
            Medium::HardDisk => "RS1_RS1",
            Medium::HardDiskExternal => "RS1_RS2",
            Medium::Floppy => "RS1_RS3",
        };
        ArchivalId::parse(raw).expect("predefined medium root IDs are always valid")
    }

    /// Human-facing label StructureBuilder overrides the root RecordSet's
    /// `rdfs:label` with (§4.3: "Labels for the three roots are
    /// overridden with human names").
    pub fn root_label(self) -> &'static str {
        match self {
            Medium::HardDisk => "Hard Disk computer",
            Medium::HardDiskExternal => "Hard Disk esterno",
            Medium::Floppy => "Floppy Disks",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cli_token())
    }
}

impl FromStr for Medium {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hd" => Ok(Medium::HardDisk),
            "hdexternal" => Ok(Medium::HardDiskExternal),
            "floppy" => Ok(Medium::Floppy),
            other => Err(PipelineError::invalid_config(format!(
                "unknown medium '{other}', expected one of: floppy, hd, hdexternal"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_medium_has_a_distinct_root() {
        let roots: Vec<_> = Medium::ALL.iter().map(|m| m.root_id()).collect();
        assert_eq!(roots[0].as_str(), "RS1_RS1");
        assert_eq!(roots[1].as_str(), "RS1_RS2");
        assert_eq!(roots[2].as_str(), "RS1_RS3");
    }

    #[test]
    fn round_trips_through_cli_token() {
        for m in Medium::ALL {
            assert_eq!(Medium::from_str(m.cli_token()).unwrap(), m);
        }
    }

    #[test]
    fn rejects_unknown_token() {
        assert!(Medium::from_str("usb").is_err());
    }
}
