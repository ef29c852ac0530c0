// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # AI-generated technical descriptions (§4.7 Group F, §6.3)
//!
//! Builds a prompt from an instantiation's collected technical-metadata
//! tuples, asks the configured [`TextGenerator`] for a natural-language
//! blurb, and attaches it as a [`TechnicalDescription`] with
//! `hasHumanValidation` fixed to `false` (§3, grounded on
//! `original_source/phase#2/step#2_ai_generated_descriptions.py`). Only
//! eligible instantiations — those with at least one technical-metadata
//! tuple and no existing description — are submitted.

use archival_pipeline_domain::entities::software::{Activity, Software};
use archival_pipeline_domain::entities::technical_description::TechnicalDescription;
use archival_pipeline_domain::error::PipelineError;
use archival_pipeline_domain::rdf::prefixes::*;
use archival_pipeline_domain::rdf::quad::Quad;
use archival_pipeline_domain::rdf::term::{GraphName, Iri, Literal};
use archival_pipeline_domain::services::text_generator::{GenerationOptions, TextGenerator};
use archival_pipeline_domain::value_objects::archival_id::ArchivalId;
use archival_pipeline_domain::value_objects::graph_iri::IriFactory;
use chrono::NaiveDate;

use crate::application::report::StageReport;

/// Builds the generation prompt from an instantiation's collected
/// `(field, value)` tuples, in stable sorted order so repeated runs over
/// unchanged metadata produce byte-identical prompts.
pub fn build_prompt(label: &str, fields: &[(String, String)]) -> String {
    let mut sorted = fields.to_vec();
    sorted.sort();
    let mut prompt = format!("Write a one-paragraph technical description of the file \"{label}\" given the following extracted metadata:\n");
    for (field, value) in &sorted {
        prompt.push_str(&format!("- {field}: {value}\n"));
    }
    prompt
}

/// Generates and emits one AI description, recording a failed generation
/// as a stage error rather than aborting the whole enrichment pass
/// (§7 "never propagates exceptions across stages").
pub async fn generate_one(
    factory: &IriFactory,
    graph: &GraphName,
    generator: &dyn TextGenerator,
    model: &str,
    id: &ArchivalId,
    label: &str,
    fields: &[(String, String)],
    generated_on: NaiveDate,
) -> Result<(Vec<Quad>, TechnicalDescription), PipelineError> {
    let prompt = build_prompt(label, fields);
    let text = generator.generate(model, &prompt, &GenerationOptions::default()).await?;

    let description = TechnicalDescription::new(id.clone(), text.trim().to_string());
    let activity = Activity::new(format!("AI description for {id}"), generated_on, Software::for_model(model), id.clone());

    let mut quads = Vec::new();
    let inst_iri = factory.instantiation(id);
    let desc_iri = Iri::new_unchecked(format!("{}_desc", inst_iri.as_str()));

    quads.push(Quad::new(inst_iri, Iri::new_unchecked(format!("{RICO}hasOrHadDescription")), desc_iri.clone().into(), graph.clone()));
    quads.push(Quad::new(desc_iri.clone(), Iri::new_unchecked(format!("{RDF}type")), Iri::new_unchecked(format!("{RICO}TextualDescription")), graph.clone()));
    quads.push(Quad::new(desc_iri.clone(), Iri::new_unchecked(RDF_VALUE), Literal::plain(description.text.clone()), graph.clone()));
    quads.push(Quad::new(desc_iri.clone(), Iri::new_unchecked(BODI_HAS_HUMAN_VALIDATION), Literal::boolean(description.has_human_validation), graph.clone()));
    quads.push(Quad::new(desc_iri, Iri::new_unchecked(BODI_GENERATED_BY), Literal::plain(activity.performed_by.label.clone()), graph.clone()));

    Ok((quads, description))
}

pub fn report_for(attempted: usize, succeeded: usize) -> StageReport {
    let mut report = StageReport::new("ai_descriptions").with_count("attempted", attempted as u64).with_count("succeeded", succeeded as u64);
    if succeeded < attempted {
        report.fail();
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use archival_pipeline_domain::error::PipelineError as Err;
    use async_trait::async_trait;

    struct FakeGenerator;

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, _model: &str, prompt: &str, _options: &GenerationOptions) -> Result<String, Err> {
            Ok(format!("generated for: {}", prompt.lines().next().unwrap()))
        }
    }

    #[test]
    fn prompt_is_built_in_stable_sorted_field_order() {
        let fields = vec![("Width".to_string(), "4000".to_string()), ("MIMEType".to_string(), "image/jpeg".to_string())];
        let prompt = build_prompt("photo.jpg", &fields);
        let mime_pos = prompt.find("MIMEType").unwrap();
        let width_pos = prompt.find("Width").unwrap();
        assert!(mime_pos < width_pos, "fields should be alphabetically sorted");
    }

    #[tokio::test]
    async fn generated_description_defaults_to_unvalidated() {
        let factory = IriFactory::new("https://example.org/bodi");
        let graph = GraphName(Iri::new_unchecked("https://example.org/bodi/ai_descriptions"));
        let id = ArchivalId::parse("RS1_RS1_R1").unwrap();
        let generator = FakeGenerator;
        let (quads, desc) = generate_one(&factory, &graph, &generator, "local-llm", &id, "photo.jpg", &[], NaiveDate::from_ymd_opt(2025, 7, 12).unwrap())
            .await
            .unwrap();
        assert!(!desc.has_human_validation);
        assert!(quads.iter().any(|q| q.object.to_string() == "\"false\"^^<http://www.w3.org/2001/XMLSchema#boolean>"));
    }
}
