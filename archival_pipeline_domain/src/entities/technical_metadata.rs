// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! TechnicalMetadata, TechnicalMetadataType, and TechnicalMetadataTypeSet
//! (§3, §9 "metadata field/value pairs are modeled as sum types with a
//! `kind` tag").

use crate::value_objects::archival_id::ArchivalId;

/// Which extraction tool produced a metadata tuple. Mirrors §4.6's three
/// extractor kinds and is used both to key `(tool, field)` ->
/// TechnicalMetadataType creation and to pick the right metadata graph
/// (§6.6: `FS_TechMeta_`, `AT_TechMeta_`, `ET_TechMeta_`, `DROID_TechMeta_`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorKind {
    /// DROID-like PUID/format identifier.
    FormatIdentifier,
    /// Tika-like REST content extractor.
    ContentExtractor,
    /// ExifTool-like CLI media extractor.
    MediaExtractor,
    /// Filesystem-derived metadata (`st_mtime` etc.), not a separate
    /// subprocess but treated as a fourth "tool" for graph/type purposes.
    FileSystem,
}

impl ExtractorKind {
    /// Graph-name prefix used by [`crate::value_objects::graph_iri::IriFactory::metadata_graph`].
    pub fn graph_prefix(self) -> &'static str {
        match self {
            ExtractorKind::FormatIdentifier => "DROID",
            ExtractorKind::ContentExtractor => "AT",
            ExtractorKind::MediaExtractor => "ET",
            ExtractorKind::FileSystem => "FS",
        }
    }

    pub fn tool_label(self) -> &'static str {
        match self {
            ExtractorKind::FormatIdentifier => "DROID",
            ExtractorKind::ContentExtractor => "Apache Tika",
            ExtractorKind::MediaExtractor => "ExifTool",
            ExtractorKind::FileSystem => "Filesystem",
        }
    }
}

/// A single extracted `(field, value)` tuple (§3, §4.6). `rdfs:label` is
/// the field name; `rdf:value` is the string value. Attached to an
/// Instantiation via `hasTechnicalMetadata` and typed by a
/// [`TechnicalMetadataType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalMetadata {
    pub instantiation: ArchivalId,
    pub field: String,
    pub value: String,
    pub kind: ExtractorKind,
}

impl TechnicalMetadata {
    pub fn new(instantiation: ArchivalId, field: impl Into<String>, value: impl Into<String>, kind: ExtractorKind) -> Self {
        Self { instantiation, field: field.into(), value: value.into(), kind }
    }
}

/// A controlled-vocabulary field name, created on first occurrence keyed
/// by `(tool, field)` (§4.6) and classified into a [`TechnicalMetadataTypeSet`]
/// by GraphEnricher (§4.7 Group B).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TechnicalMetadataType {
    pub kind: ExtractorKind,
    pub field: String,
}

impl TechnicalMetadataType {
    pub fn new(kind: ExtractorKind, field: impl Into<String>) -> Self {
        Self { kind, field: field.into() }
    }

    pub fn label(&self) -> &str {
        &self.field
    }
}

/// The fixed, ten-member coarse-category enumeration GraphEnricher
/// bootstraps on every run (§4.7 Group B, "TechnicalMetadataTypeSet
/// bootstrap").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TechnicalMetadataTypeSet {
    FileSystem,
    DocumentContent,
    Image,
    Audio,
    Video,
    Email,
    Executable,
    CompressedFile,
    Security,
    Other,
}

impl TechnicalMetadataTypeSet {
    pub const ALL: [TechnicalMetadataTypeSet; 10] = [
        TechnicalMetadataTypeSet::FileSystem,
        TechnicalMetadataTypeSet::DocumentContent,
        TechnicalMetadataTypeSet::Image,
        TechnicalMetadataTypeSet::Audio,
        TechnicalMetadataTypeSet::Video,
        TechnicalMetadataTypeSet::Email,
        TechnicalMetadataTypeSet::Executable,
        TechnicalMetadataTypeSet::CompressedFile,
        TechnicalMetadataTypeSet::Security,
        TechnicalMetadataTypeSet::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TechnicalMetadataTypeSet::FileSystem => "FileSystem",
            TechnicalMetadataTypeSet::DocumentContent => "DocumentContent",
            TechnicalMetadataTypeSet::Image => "Image",
            TechnicalMetadataTypeSet::Audio => "Audio",
            TechnicalMetadataTypeSet::Video => "Video",
            TechnicalMetadataTypeSet::Email => "Email",
            TechnicalMetadataTypeSet::Executable => "Executable",
            TechnicalMetadataTypeSet::CompressedFile => "CompressedFile",
            TechnicalMetadataTypeSet::Security => "Security",
            TechnicalMetadataTypeSet::Other => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extractor_kind_maps_to_fixed_graph_prefixes() {
        assert_eq!(ExtractorKind::FormatIdentifier.graph_prefix(), "DROID");
        assert_eq!(ExtractorKind::ContentExtractor.graph_prefix(), "AT");
        assert_eq!(ExtractorKind::MediaExtractor.graph_prefix(), "ET");
        assert_eq!(ExtractorKind::FileSystem.graph_prefix(), "FS");
    }

    #[test]
    fn type_set_enumeration_has_ten_members() {
        assert_eq!(TechnicalMetadataTypeSet::ALL.len(), 10);
    }
}
