// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! TechnicalDescription entity (§3, §6.3): an AI-generated natural-language
//! blurb attached to an eligible Instantiation.

use crate::value_objects::archival_id::ArchivalId;

/// An LLM-generated description of an instantiation's technical metadata.
/// `hasHumanValidation` always starts `false` (§3, original_source
/// `step#2_ai_generated_descriptions.py`: "Add hasHumanValidation = false")
/// until an archivist reviews it — the pipeline never flips this bit
/// itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalDescription {
    pub instantiation: ArchivalId,
    pub text: String,
    pub has_human_validation: bool,
}

impl TechnicalDescription {
    pub fn new(instantiation: ArchivalId, text: impl Into<String>) -> Self {
        Self { instantiation, text: text.into(), has_human_validation: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_description_defaults_to_unvalidated() {
        let desc = TechnicalDescription::new(ArchivalId::parse("RS1_RS1_R1").unwrap(), "A JPEG photograph, 4000x3000px.");
        assert!(!desc.has_human_validation);
    }
}
