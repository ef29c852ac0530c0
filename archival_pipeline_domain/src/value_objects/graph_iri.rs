// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Named graph IRI construction (§6.6).

use crate::entities::technical_metadata::TechnicalMetadataTypeSet;
use crate::rdf::nquads::percent_encode;
use crate::rdf::term::{GraphName, Iri};
use crate::value_objects::archival_id::ArchivalId;
use crate::value_objects::medium::Medium;

/// Builds the IRI schemas fixed by §6.6, given a configured `base` IRI
/// (e.g. `https://example.org/bodi`). Every method returns a fully formed
/// [`Iri`]/[`GraphName`] so callers never string-format IRIs by hand.
#[derive(Debug, Clone)]
pub struct IriFactory {
    base: String,
}

impl IriFactory {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    fn join(&self, segment: &str) -> Iri {
        Iri::new_unchecked(format!("{}/{}", self.base, segment))
    }

    pub fn record_or_set(&self, id: &ArchivalId) -> Iri {
        self.join(id.as_str())
    }

    pub fn identifier(&self, id: &ArchivalId) -> Iri {
        self.join(&format!("{}_id", id.as_str()))
    }

    pub fn instantiation(&self, id: &ArchivalId) -> Iri {
        self.join(&format!("{}_inst", id.as_str()))
    }

    pub fn location(&self, id: &ArchivalId) -> Iri {
        self.join(&format!("{}_inst_path", id.as_str()))
    }

    pub fn fixity(&self, id: &ArchivalId) -> Iri {
        self.join(&format!("{}_inst_hash", id.as_str()))
    }

    pub fn sha256_algorithm(&self) -> Iri {
        self.join("mechanism/sha256")
    }

    /// `storage_location/<ROOT_ID>`, one per predefined medium root (§3
    /// invariant 8).
    pub fn storage_location(&self, root_id: &ArchivalId) -> Iri {
        self.join(&format!("storage_location/{}", percent_encode(root_id.as_str())))
    }

    /// `storage_medium/<ROOT_ID>`, the hardware/institution descriptor
    /// chained off a [`IriFactory::storage_location`] (§3 invariant 8).
    pub fn storage_medium(&self, root_id: &ArchivalId) -> Iri {
        self.join(&format!("storage_medium/{}", percent_encode(root_id.as_str())))
    }

    /// The shared `RS1` container RecordSet that logically holds all
    /// three medium roots (§3 invariant 9, §4.3).
    pub fn container_root(&self) -> Iri {
        self.join(ArchivalId::container_root().as_str())
    }

    /// `metadata_type/<TOOL>_<field>`, percent-encoded field name. Identifies
    /// a TechnicalMetadataType, created once per distinct `(tool, field)`
    /// pair (§4.6).
    pub fn metadata_type(&self, tool_prefix: &str, field: &str) -> Iri {
        self.join(&format!("metadata_type/{tool_prefix}_{}", percent_encode(field)))
    }

    /// `metadata_type_set/<Set>`, one of the ten fixed coarse categories
    /// GraphEnricher bootstraps on every run (§4.7 Group B).
    pub fn type_set(&self, set: TechnicalMetadataTypeSet) -> Iri {
        self.join(&format!("metadata_type_set/{}", set.label()))
    }

    /// `date_YYYYMMDD`, canonical per calendar day (§3 invariant 7).
    pub fn date(&self, normalized_yyyy_mm_dd: &str) -> Iri {
        self.join(&format!("date_{}", normalized_yyyy_mm_dd.replace('-', "")))
    }

    /// `software_NNNN`, 4-digit zero-padded.
    pub fn software(&self, counter: u32) -> Iri {
        self.join(&format!("software_{counter:04}"))
    }

    /// `ai_textgen_activity_NNNN_<id>`.
    pub fn ai_text_activity(&self, counter: u32, id: &ArchivalId) -> Iri {
        self.join(&format!("ai_textgen_activity_{counter:04}_{}", percent_encode(id.as_str())))
    }

    /// `structure/<ROOT_ID>`, percent-encoded.
    pub fn structure_graph(&self, root_id: &ArchivalId) -> GraphName {
        GraphName(self.join(&format!("structure/{}", percent_encode(root_id.as_str()))))
    }

    /// `<TOOL>_TechMeta_<medium>` metadata graphs (§6.6 lists
    /// `FS_TechMeta_`, `AT_TechMeta_`, `ET_TechMeta_`, `DROID_TechMeta_`).
    pub fn metadata_graph(&self, tool_prefix: &str, medium: Medium) -> GraphName {
        GraphName(self.join(&format!("{tool_prefix}_TechMeta_{}", medium.cli_token())))
    }

    pub fn enrichment_graph(&self) -> GraphName {
        GraphName(self.join("updated_relations"))
    }

    pub fn ai_descriptions_graph(&self) -> GraphName {
        GraphName(self.join("ai_descriptions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> IriFactory {
        IriFactory::new("https://example.org/bodi")
    }

    #[test]
    fn strips_trailing_slash_from_base() {
        let f = IriFactory::new("https://example.org/bodi/");
        let id = ArchivalId::parse("RS1_RS1_R1").unwrap();
        assert_eq!(f.record_or_set(&id).as_str(), "https://example.org/bodi/RS1_RS1_R1");
    }

    #[test]
    fn derived_iris_follow_the_fixed_suffixes() {
        let f = factory();
        let id = ArchivalId::parse("RS1_RS1_R1").unwrap();
        assert_eq!(f.identifier(&id).as_str(), "https://example.org/bodi/RS1_RS1_R1_id");
        assert_eq!(f.instantiation(&id).as_str(), "https://example.org/bodi/RS1_RS1_R1_inst");
        assert_eq!(f.location(&id).as_str(), "https://example.org/bodi/RS1_RS1_R1_inst_path");
        assert_eq!(f.fixity(&id).as_str(), "https://example.org/bodi/RS1_RS1_R1_inst_hash");
    }

    #[test]
    fn date_iri_strips_dashes() {
        assert_eq!(factory().date("2025-07-12").as_str(), "https://example.org/bodi/date_20250712");
    }

    #[test]
    fn software_counter_is_zero_padded_to_four_digits() {
        assert_eq!(factory().software(7).as_str(), "https://example.org/bodi/software_0007");
    }

    #[test]
    fn structure_graph_percent_encodes_root_id() {
        let root = Medium::HardDisk.root_id();
        assert_eq!(factory().structure_graph(&root).to_string(), "<https://example.org/bodi/structure/RS1_RS1>");
    }

    #[test]
    fn metadata_graph_names_match_medium_token() {
        let g = factory().metadata_graph("DROID", Medium::Floppy);
        assert_eq!(g.to_string(), "<https://example.org/bodi/DROID_TechMeta_floppy>");
    }

    #[test]
    fn storage_location_and_medium_are_keyed_by_root_id() {
        let root = Medium::HardDiskExternal.root_id();
        assert_eq!(factory().storage_location(&root).as_str(), "https://example.org/bodi/storage_location/RS1_RS2");
        assert_eq!(factory().storage_medium(&root).as_str(), "https://example.org/bodi/storage_medium/RS1_RS2");
    }

    #[test]
    fn container_root_iri_is_the_shared_rs1_node() {
        assert_eq!(factory().container_root().as_str(), "https://example.org/bodi/RS1");
    }
}
