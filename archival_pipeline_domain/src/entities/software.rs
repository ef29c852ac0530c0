// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Software and Activity entities (§3).

use chrono::NaiveDate;

use crate::entities::technical_metadata::ExtractorKind;
use crate::value_objects::archival_id::ArchivalId;

/// An extraction tool or LLM model (§3: "ExifTool, Tika, DROID, or an LLM
/// model"), created on first use and deduplicated by canonical label
/// (§4.6, §6.4 URI counters `software_cache`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Software {
    pub label: String,
    pub documentation: Option<String>,
}

impl Software {
    pub fn new(label: impl Into<String>, documentation: Option<String>) -> Self {
        Self { label: label.into(), documentation }
    }

    /// Canonical label for a known extractor kind, used as the dedup key
    /// in the `software_cache`.
    pub fn for_extractor(kind: ExtractorKind) -> Self {
        let (label, doc) = match kind {
            ExtractorKind::FormatIdentifier => {
                ("DROID", Some("https://www.nationalarchives.gov.uk/information-management/manage-information/preserving-digital-records/droid/"))
            }
            ExtractorKind::ContentExtractor => ("Apache Tika", Some("https://tika.apache.org/")),
            ExtractorKind::MediaExtractor => ("ExifTool", Some("https://exiftool.org/")),
            ExtractorKind::FileSystem => ("Filesystem", None),
        };
        Self::new(label, doc.map(str::to_string))
    }

    /// Canonical label for an LLM model used by the AI description pass
    /// (§4.7, §6.3).
    pub fn for_model(model_name: impl Into<String>) -> Self {
        Self::new(model_name, None)
    }
}

/// A generation/extraction event: one per extraction batch or AI
/// generation (§3). Links a [`Software`] (`performedBy`) and, for AI
/// descriptions, a supervising Person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub label: String,
    pub occurred_at: NaiveDate,
    pub performed_by: Software,
    pub supervisor: Option<String>,
    pub subject: ArchivalId,
}

impl Activity {
    pub fn new(label: impl Into<String>, occurred_at: NaiveDate, performed_by: Software, subject: ArchivalId) -> Self {
        Self { label: label.into(), occurred_at, performed_by, supervisor: None, subject }
    }

    pub fn with_supervisor(mut self, supervisor: impl Into<String>) -> Self {
        self.supervisor = Some(supervisor.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn software_for_extractor_uses_canonical_labels() {
        assert_eq!(Software::for_extractor(ExtractorKind::FormatIdentifier).label, "DROID");
        assert_eq!(Software::for_extractor(ExtractorKind::ContentExtractor).label, "Apache Tika");
        assert_eq!(Software::for_extractor(ExtractorKind::MediaExtractor).label, "ExifTool");
    }

    #[test]
    fn activity_supervisor_defaults_to_none() {
        let sw = Software::for_extractor(ExtractorKind::MediaExtractor);
        let activity = Activity::new("ExifTool batch 1", NaiveDate::from_ymd_opt(2025, 7, 12).unwrap(), sw, ArchivalId::parse("RS1_RS1_R1").unwrap());
        assert!(activity.supervisor.is_none());
    }
}
