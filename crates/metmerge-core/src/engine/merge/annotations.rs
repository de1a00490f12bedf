use crate::core::identifiers::namespace::Namespace;
use crate::core::identifiers::properties::PropertyBag;
use crate::core::models::annotation::{merge_annotation_value, AnnotationValue, Annotations};
use crate::core::models::gene::Gene;
use crate::core::models::metabolite::Metabolite;
use crate::core::models::reaction::Reaction;

const METABOLITE_SBO_TERM: &str = "SBO:0000247";
const GENE_SBO_TERM: &str = "SBO:0000243";

fn metabolite_annotation_key(namespace: &Namespace) -> String {
    match namespace {
        Namespace::Bigg => "bigg.metabolite".to_string(),
        Namespace::Chebi => "chebi".to_string(),
        Namespace::Metanetx => "metanetx.chemical".to_string(),
        Namespace::Seed => "seed.compound".to_string(),
        Namespace::Kegg => "kegg.compound".to_string(),
        Namespace::Reactome => "reactome.compound".to_string(),
        other => other.to_string(),
    }
}

fn reaction_annotation_key(namespace: &Namespace) -> String {
    match namespace {
        Namespace::Bigg => "bigg.reaction".to_string(),
        Namespace::Metanetx => "metanetx.reaction".to_string(),
        Namespace::Seed => "seed.reaction".to_string(),
        other => other.to_string(),
    }
}

fn has_value(annotations: &Annotations, key: &str) -> bool {
    annotations.get(key).is_some_and(|value| !value.is_empty())
}

fn list_value(values: &[String]) -> Option<AnnotationValue> {
    match values {
        [] => None,
        [single] => Some(AnnotationValue::Scalar(single.clone())),
        many => Some(AnnotationValue::List(many.to_vec())),
    }
}

/// Adds every identifier of the canonical compound to the metabolite's
/// annotations, plus its inchikey, the metabolite SBO term and a missing
/// formula.
pub fn extend_metabolite(metabolite: &mut Metabolite, properties: &PropertyBag) {
    let annotations = &mut metabolite.annotations;
    for raw in properties.ids() {
        let value = match raw.namespace() {
            Namespace::Chebi => format!("CHEBI:{}", raw.local()),
            _ => raw.local().to_string(),
        };
        merge_annotation_value(
            annotations,
            &metabolite_annotation_key(raw.namespace()),
            AnnotationValue::Scalar(value),
        );
    }

    if !has_value(annotations, "inchikey") && !has_value(annotations, "inchi_key") {
        if let Some(inchikey) = list_value(properties.inchikey()) {
            annotations.insert("inchikey".to_string(), inchikey);
        }
    }

    if !has_value(annotations, "sbo") {
        annotations.insert("sbo".to_string(), AnnotationValue::from(METABOLITE_SBO_TERM));
    }

    let formula_missing = metabolite.formula.as_deref().is_none_or(str::is_empty);
    if formula_missing {
        if let Some(formula) = properties.formula().first() {
            metabolite.formula = Some(formula.clone());
        }
    }
}

/// Adds every identifier of the canonical reaction and its EC numbers.
pub fn extend_reaction(reaction: &mut Reaction, properties: &PropertyBag) {
    let annotations = &mut reaction.annotations;
    for raw in properties.ids() {
        merge_annotation_value(
            annotations,
            &reaction_annotation_key(raw.namespace()),
            AnnotationValue::from(raw.local()),
        );
    }

    if !has_value(annotations, "ec-code") {
        if let Some(ec_numbers) = list_value(properties.ec_numbers()) {
            annotations.insert("ec-code".to_string(), ec_numbers);
        }
    }
}

pub fn extend_gene(gene: &mut Gene) {
    gene.annotations
        .insert("sbo".to_string(), AnnotationValue::from(GENE_SBO_TERM));
}
