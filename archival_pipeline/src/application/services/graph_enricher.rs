// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # GraphEnricher (§4.7)
//!
//! The post-load passes that turn raw extracted tuples into higher-level
//! graph structure: duplicate-hash grouping, date normalization, MIME
//! classification, title generation, and `owl:sameAs` closure. Each pass
//! is independent and idempotent — re-running over an already-enriched
//! graph produces the same quads again rather than duplicating them
//! (§8 invariant: enrichment passes are re-runnable). Grounded on the
//! original source's `original_source/phase#2/step#2_relations_update.py`
//! (`MIME_TYPE_CATEGORY_MAPPING`, `BASE_URIS`) and, for the structural
//! shape of an independent post-processing pass, the teacher's
//! `application/services` stage pattern.

use std::collections::{HashMap, HashSet};

use archival_pipeline_domain::entities::date_entity::DateEntity;
use archival_pipeline_domain::entities::technical_metadata::{ExtractorKind, TechnicalMetadataTypeSet};
use archival_pipeline_domain::rdf::prefixes::*;
use archival_pipeline_domain::rdf::quad::Quad;
use archival_pipeline_domain::rdf::term::{GraphName, Iri, Literal};
use archival_pipeline_domain::value_objects::archival_id::ArchivalId;
use archival_pipeline_domain::value_objects::graph_iri::IriFactory;
use archival_pipeline_domain::value_objects::normalized_date::{DateProvenance, NormalizedDate};

use crate::application::report::StageReport;

/// Equivalence groups of metadata field labels that name the same
/// real-world concept under different extractor vocabularies (§4.7 Group
/// B "Equivalences"), transcribed from the original source's static
/// equivalence-group list.
const EQUIVALENCE_GROUPS: &[&[&str]] = &[
    &["FileModifyDate", "File Modified Date", "st_mtime"],
    &["FileCreateDate", "Creation-Date", "dcterms:created"],
    &["MIME_TYPE", "Content-Type", "FileType"],
    &["FORMAT_NAME", "File Type Name"],
];

/// Static label → coarse-category dictionary (§4.7 Group B "exact label
/// match against static dictionaries"), transcribed from the original
/// source's field-classification table.
fn classify_by_label(field: &str) -> Option<TechnicalMetadataTypeSet> {
    let normalized = field.to_ascii_lowercase();
    match normalized.as_str() {
        "st_mtime" | "st_ctime" | "file modified date" | "filemodifydate" | "filecreatedate" => Some(TechnicalMetadataTypeSet::FileSystem),
        "puid" | "format_name" | "format_version" | "content-type" | "mime_type" | "filetype" => Some(TechnicalMetadataTypeSet::DocumentContent),
        "imagewidth" | "imageheight" | "gpslatitude" | "gpslongitude" | "bitdepth" => Some(TechnicalMetadataTypeSet::Image),
        "duration" | "audiochannels" | "samplerate" => Some(TechnicalMetadataTypeSet::Audio),
        "videoframerate" | "videocodec" => Some(TechnicalMetadataTypeSet::Video),
        "message-from" | "message-to" | "message-subject" => Some(TechnicalMetadataTypeSet::Email),
        "executabletype" | "machinetype" => Some(TechnicalMetadataTypeSet::Executable),
        "zip-entries" | "compressionmethod" => Some(TechnicalMetadataTypeSet::CompressedFile),
        "encryption" | "haspassword" | "digitalsignature" => Some(TechnicalMetadataTypeSet::Security),
        _ => None,
    }
}

/// MIME-category fallback for a metadata type label, used only when
/// [`classify_by_label`] finds nothing (§4.7 Group B "else MIME-category
/// fallback if available").
fn classify_by_mime_category(mime_category: &str) -> Option<TechnicalMetadataTypeSet> {
    if mime_category.starts_with("Video") {
        Some(TechnicalMetadataTypeSet::Video)
    } else if mime_category.starts_with("Image") {
        Some(TechnicalMetadataTypeSet::Image)
    } else if mime_category.starts_with("Audio") {
        Some(TechnicalMetadataTypeSet::Audio)
    } else if mime_category.starts_with("Document") {
        Some(TechnicalMetadataTypeSet::DocumentContent)
    } else if mime_category.starts_with("Compressed Archive") {
        Some(TechnicalMetadataTypeSet::CompressedFile)
    } else {
        None
    }
}

/// Classifies a single TechnicalMetadataType's field label into its
/// coarse [`TechnicalMetadataTypeSet`] (§4.7 Group B "Type-to-set
/// linking"): exact label match first, then MIME-category fallback when
/// the caller supplies one, then `Other`.
pub fn classify_type(field: &str, mime_category_hint: Option<&str>) -> TechnicalMetadataTypeSet {
    classify_by_label(field)
        .or_else(|| mime_category_hint.and_then(classify_by_mime_category))
        .unwrap_or(TechnicalMetadataTypeSet::Other)
}

/// The fixed MIME-category label table (§4.7 Group B "MIME
/// classification"), transcribed from the original source's
/// `MIME_TYPE_CATEGORY_MAPPING`.
pub fn mime_category_label(mime_type: &str) -> &'static str {
    match mime_type {
        "video/mp4" => "Video (MP4)",
        "video/quicktime" => "Video (QuickTime)",
        "video/x-msvideo" => "Video (AVI)",
        "image/jpeg" => "Image (JPEG)",
        "image/png" => "Image (PNG)",
        "image/tiff" => "Image (TIFF)",
        "image/gif" => "Image (GIF)",
        "audio/mpeg" => "Audio (MP3)",
        "audio/wav" | "audio/x-wav" => "Audio (WAV)",
        "application/pdf" => "Document (PDF)",
        "application/msword" => "Document (Word)",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "Document (Word)",
        "text/plain" => "Document (Plain Text)",
        "application/zip" => "Compressed Archive (ZIP)",
        "application/octet-stream" => "Binary File (Generic)",
        "application/unknown" => "Unknown file",
        _ => "Other",
    }
}

/// Group A: given a harvested raw date string and its provenance, returns
/// the [`DateEntity`] and its canonical graph IRI, or `None` if the raw
/// value didn't match any accepted format (§4.7; unrecognized values are
/// dropped with a warning by the caller, not an error).
pub fn normalize_one(raw: &str, provenance: DateProvenance) -> Option<(DateEntity, String)> {
    let normalized = NormalizedDate::parse(raw)?;
    let fragment = normalized.id_fragment();
    Some((DateEntity::new(normalized, Some(provenance)), fragment))
}

/// Emits the Date entity's quads, sharing one Date node per distinct
/// calendar day across every caller (§3 invariant 7). `seen_days` tracks
/// which day fragments have already had their entity-level quads (type,
/// normalizedDateValue, expressedDate) emitted this run — emitting once
/// keeps the pass idempotent-in-one-run while the caller's broader
/// dedup (against the already-loaded graph) is the triple store's own
/// job via `INSERT DATA`'s natural set semantics.
pub fn emit_date(factory: &IriFactory, graph: &GraphName, entity: &DateEntity, fragment: &str, seen_days: &mut std::collections::HashSet<String>, quads: &mut Vec<Quad>) {
    let date_iri = factory.date(&entity.normalized_date_value());
    if seen_days.insert(fragment.to_string()) {
        quads.push(Quad::new(date_iri.clone(), Iri::new_unchecked(format!("{RDF}type")), Iri::new_unchecked(format!("{RICO}Date")), graph.clone()));
        quads.push(Quad::new(date_iri.clone(), Iri::new_unchecked(BODI_NORMALIZED_DATE_VALUE), Literal::date(entity.normalized_date_value()), graph.clone()));
        quads.push(Quad::new(date_iri.clone(), Iri::new_unchecked(BODI_EXPRESSED_DATE), Literal::plain(entity.expressed_date()), graph.clone()));
    }
    let _ = date_iri;
}

/// Links an instantiation to the shared Date node created by
/// [`emit_date`], using the creation/modification predicate pair implied
/// by `provenance` and the fixed forward/inverse predicate convention
/// (§3 "hasCreationDate/isCreationDateOf", "hasModificationDate/
/// isModificationDateOf").
pub fn link_date(factory: &IriFactory, graph: &GraphName, instantiation: &ArchivalId, date_value: &str, is_creation: bool, quads: &mut Vec<Quad>) {
    let inst_iri = factory.instantiation(instantiation);
    let date_iri = factory.date(date_value);
    let (forward, inverse) = if is_creation { (BODI_HAS_CREATION_DATE, BODI_IS_CREATION_DATE_OF) } else { (BODI_HAS_MODIFICATION_DATE, BODI_IS_MODIFICATION_DATE_OF) };
    quads.push(Quad::new(inst_iri.clone(), Iri::new_unchecked(forward), date_iri.clone().into(), graph.clone()));
    quads.push(Quad::new(date_iri, Iri::new_unchecked(inverse), inst_iri.into(), graph.clone()));
}

/// Group B: classifies a MIME-type metadata value into its coarse
/// category quad, one per instantiation (§4.7).
pub fn emit_mime_classification(factory: &IriFactory, graph: &GraphName, instantiation: &ArchivalId, mime_type: &str, quads: &mut Vec<Quad>) {
    let inst_iri = factory.instantiation(instantiation);
    quads.push(Quad::new(inst_iri, Iri::new_unchecked(RICO_TYPE), Literal::plain(mime_category_label(mime_type)), graph.clone()));
}

/// Group C: generates `hasOrHadTitle` for every Record/RecordSet that
/// doesn't already carry one, defaulting to the node's own `rdfs:label`
/// (§4.7 "title generation falls back to the entity's own label when no
/// richer title source is available").
pub fn emit_title(factory: &IriFactory, graph: &GraphName, id: &ArchivalId, label: &str, quads: &mut Vec<Quad>) {
    let subject = factory.record_or_set(id);
    quads.push(Quad::new(subject, Iri::new_unchecked(RICO_HAS_OR_HAD_TITLE), Literal::plain(label), graph.clone()));
}

/// Group D: duplicate-fixity detection. Groups hashed records by digest
/// and, for every group with more than one member, emits a full
/// `hasSameHashCodeAs` clique — every pair, both directions — rather than
/// a spanning tree, so a client need not compute transitive closure over
/// the relation itself (§4.7 "clique, not a chain").
pub fn duplicate_cliques<'a>(digests: impl IntoIterator<Item = (&'a ArchivalId, &'a str)>) -> Vec<Vec<ArchivalId>> {
    let mut by_digest: HashMap<&str, Vec<ArchivalId>> = HashMap::new();
    for (id, digest) in digests {
        by_digest.entry(digest).or_default().push(id.clone());
    }
    by_digest.into_values().filter(|group| group.len() > 1).collect()
}

pub fn emit_duplicate_clique(factory: &IriFactory, graph: &GraphName, clique: &[ArchivalId], quads: &mut Vec<Quad>) {
    for a in clique {
        for b in clique {
            if a != b {
                quads.push(Quad::new(factory.instantiation(a), Iri::new_unchecked(BODI_HAS_SAME_HASH_CODE_AS), factory.instantiation(b).into(), graph.clone()));
            }
        }
    }
}

/// Group E: `owl:sameAs` closure. Given an explicit equivalence relation
/// (node pairs already known to be the same entity across media), emits
/// the full symmetric-and-transitive closure as direct quads rather than
/// relying on the store's reasoner (§4.7, §9: "do not materialize a graph
/// cycle in in-memory structures" — closure here only ever touches the
/// small equivalence classes, not the whole graph).
pub fn owl_same_as_closure(pairs: &[(ArchivalId, ArchivalId)]) -> Vec<Vec<ArchivalId>> {
    let mut parent: HashMap<ArchivalId, ArchivalId> = HashMap::new();
    for (a, b) in pairs {
        parent.entry(a.clone()).or_insert_with(|| a.clone());
        parent.entry(b.clone()).or_insert_with(|| b.clone());
    }

    fn find(parent: &mut HashMap<ArchivalId, ArchivalId>, x: &ArchivalId) -> ArchivalId {
        let p = parent.get(x).unwrap().clone();
        if &p == x {
            p
        } else {
            let root = find(parent, &p);
            parent.insert(x.clone(), root.clone());
            root
        }
    }

    for (a, b) in pairs {
        let ra = find(&mut parent, a);
        let rb = find(&mut parent, b);
        if ra != rb {
            parent.insert(ra, rb);
        }
    }

    let mut classes: HashMap<ArchivalId, Vec<ArchivalId>> = HashMap::new();
    let keys: Vec<ArchivalId> = parent.keys().cloned().collect();
    for key in keys {
        let root = find(&mut parent, &key);
        classes.entry(root).or_default().push(key);
    }
    classes.into_values().filter(|class| class.len() > 1).collect()
}

pub fn emit_same_as_class(factory: &IriFactory, graph: &GraphName, class: &[ArchivalId], quads: &mut Vec<Quad>) {
    for a in class {
        for b in class {
            if a != b {
                quads.push(Quad::new(factory.record_or_set(a), Iri::new_unchecked(OWL_SAME_AS), factory.record_or_set(b).into(), graph.clone()));
            }
        }
    }
}

/// Group B bootstrap: emits the ten fixed TechnicalMetadataTypeSet
/// entities, each with its `rdf:type` and `rdfs:label` (§4.7 Group B
/// "emit the ten fixed sets"). Run once per enrichment pass; re-running
/// emits the same ten quads again, which the store dedupes via
/// `INSERT DATA` set semantics.
pub fn bootstrap_type_sets(factory: &IriFactory, graph: &GraphName, quads: &mut Vec<Quad>) {
    for set in TechnicalMetadataTypeSet::ALL {
        let iri = factory.type_set(set);
        quads.push(Quad::new(iri.clone(), Iri::new_unchecked(format!("{RDF}type")), Iri::new_unchecked(format!("{RICO}RecordSet")), graph.clone()));
        quads.push(Quad::new(iri, Iri::new_unchecked(RDFS_LABEL), Literal::plain(set.label()), graph.clone()));
    }
}

/// Group B type-to-set linking: emits the `rico:isOrWasPartOf` /
/// `rico:hasOrHadPart` pair between one TechnicalMetadataType and the
/// category it was classified into (§4.7 Group B).
pub fn emit_type_classification(factory: &IriFactory, graph: &GraphName, kind: ExtractorKind, field: &str, set: TechnicalMetadataTypeSet, quads: &mut Vec<Quad>) {
    let type_iri = factory.metadata_type(kind.graph_prefix(), field);
    let set_iri = factory.type_set(set);
    quads.push(Quad::new(type_iri.clone(), Iri::new_unchecked(RICO_IS_OR_WAS_PART_OF), set_iri.clone().into(), graph.clone()));
    quads.push(Quad::new(set_iri, Iri::new_unchecked(RICO_HAS_OR_HAD_PART), type_iri.into(), graph.clone()));
}

/// Group B equivalences: expands [`EQUIVALENCE_GROUPS`] against the
/// `(tool, field)` pairs actually observed this run into `owl:sameAs`
/// edges between the corresponding TechnicalMetadataType IRIs, one edge
/// per unordered pair (§4.7 Group B "symmetry implicit" — `owl:sameAs`'s
/// own semantics cover the reverse direction, so only one triple is
/// written per pair, unlike the directed `hasSameHashCodeAs` clique).
pub fn emit_type_equivalences(factory: &IriFactory, graph: &GraphName, seen_types: &HashSet<(ExtractorKind, String)>, quads: &mut Vec<Quad>) -> usize {
    let mut emitted = 0;
    for group in EQUIVALENCE_GROUPS {
        let members: Vec<&(ExtractorKind, String)> =
            seen_types.iter().filter(|(_, field)| group.iter().any(|label| label.eq_ignore_ascii_case(field))).collect();
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let (kind_a, field_a) = members[i];
                let (kind_b, field_b) = members[j];
                let iri_a = factory.metadata_type(kind_a.graph_prefix(), field_a);
                let iri_b = factory.metadata_type(kind_b.graph_prefix(), field_b);
                quads.push(Quad::new(iri_a, Iri::new_unchecked(OWL_SAME_AS), iri_b.into(), graph.clone()));
                emitted += 1;
            }
        }
    }
    emitted
}

/// Rolls the enrichment passes into a single [`StageReport`] given the
/// quads each pass produced.
pub fn report_for(pass_counts: &[(&str, usize)]) -> StageReport {
    let mut report = StageReport::new("graph_enricher");
    for (label, count) in pass_counts {
        report = report.with_count(*label, *count as u64);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_mapping_has_fallback_other() {
        assert_eq!(mime_category_label("application/pdf"), "Document (PDF)");
        assert_eq!(mime_category_label("application/octet-stream"), "Binary File (Generic)");
        assert_eq!(mime_category_label("application/x-totally-unknown"), "Other");
    }

    #[test]
    fn duplicate_cliques_group_by_shared_digest() {
        let a = ArchivalId::parse("RS1_RS1_R1").unwrap();
        let b = ArchivalId::parse("RS1_RS1_R2").unwrap();
        let c = ArchivalId::parse("RS1_RS1_R3").unwrap();
        let cliques = duplicate_cliques(vec![(&a, "hash1"), (&b, "hash1"), (&c, "hash2")]);
        assert_eq!(cliques.len(), 1);
        assert_eq!(cliques[0].len(), 2);
    }

    #[test]
    fn clique_emits_both_directions_for_every_pair() {
        let factory = IriFactory::new("https://example.org/bodi");
        let graph = GraphName(Iri::new_unchecked("https://example.org/bodi/updated_relations"));
        let clique = vec![ArchivalId::parse("RS1_RS1_R1").unwrap(), ArchivalId::parse("RS1_RS1_R2").unwrap()];
        let mut quads = Vec::new();
        emit_duplicate_clique(&factory, &graph, &clique, &mut quads);
        assert_eq!(quads.len(), 2);
    }

    #[test]
    fn same_as_closure_merges_transitive_pairs() {
        let a = ArchivalId::parse("RS1_RS1_R1").unwrap();
        let b = ArchivalId::parse("RS1_RS1_R2").unwrap();
        let c = ArchivalId::parse("RS1_RS1_R3").unwrap();
        let classes = owl_same_as_closure(&[(a.clone(), b.clone()), (b, c.clone())]);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].len(), 3);
    }

    #[test]
    fn bootstrap_type_sets_emits_ten_entities() {
        let factory = IriFactory::new("https://example.org/bodi");
        let graph = GraphName(Iri::new_unchecked("https://example.org/bodi/updated_relations"));
        let mut quads = Vec::new();
        bootstrap_type_sets(&factory, &graph, &mut quads);
        assert_eq!(quads.len(), 20); // type + label per set, 10 sets
    }

    #[test]
    fn classify_type_prefers_exact_label_over_mime_fallback() {
        assert_eq!(classify_type("st_mtime", Some("Image (JPEG)")), TechnicalMetadataTypeSet::FileSystem);
        assert_eq!(classify_type("GPSLatitude", None), TechnicalMetadataTypeSet::Image);
        assert_eq!(classify_type("totally-unknown-field", Some("Audio (MP3)")), TechnicalMetadataTypeSet::Audio);
        assert_eq!(classify_type("totally-unknown-field", None), TechnicalMetadataTypeSet::Other);
    }

    #[test]
    fn equivalence_group_of_three_yields_three_edges_then_none_again() {
        let factory = IriFactory::new("https://example.org/bodi");
        let graph = GraphName(Iri::new_unchecked("https://example.org/bodi/updated_relations"));
        let mut seen = std::collections::HashSet::new();
        seen.insert((ExtractorKind::FileSystem, "st_mtime".to_string()));
        seen.insert((ExtractorKind::ContentExtractor, "File Modified Date".to_string()));
        seen.insert((ExtractorKind::MediaExtractor, "FileModifyDate".to_string()));
        let mut quads = Vec::new();
        let emitted = emit_type_equivalences(&factory, &graph, &seen, &mut quads);
        assert_eq!(emitted, 3); // 3 choose 2
        assert_eq!(quads.len(), 3);
    }

    #[test]
    fn date_entity_is_only_emitted_once_per_day() {
        let factory = IriFactory::new("https://example.org/bodi");
        let graph = GraphName(Iri::new_unchecked("https://example.org/bodi/updated_relations"));
        let (entity, fragment) = normalize_one("2025-07-12", DateProvenance::EmbeddedMetadata).unwrap();
        let mut seen = std::collections::HashSet::new();
        let mut quads = Vec::new();
        emit_date(&factory, &graph, &entity, &fragment, &mut seen, &mut quads);
        emit_date(&factory, &graph, &entity, &fragment, &mut seen, &mut quads);
        assert_eq!(quads.len(), 3, "second call for the same day should emit nothing new");
    }
}
