use crate::core::identifiers::compartments::{
    map_compartment, split_compartment_suffix, strip_compartment_suffix,
};
use crate::core::identifiers::table::IdentifierTable;
use crate::core::models::annotation::{AnnotationValue, Annotations};
use crate::core::models::ids::CanonicalId;
use crate::core::models::metabolite::Metabolite;

// Annotation keys holding ontology terms rather than database identifiers.
const SKIPPED_ANNOTATION_KEYS: [&str; 1] = ["sbo"];

/// A model metabolite placed in the canonical identifier space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalMetabolite {
    pub id: CanonicalId,
    /// Normalized compartment code; empty when the metabolite names none.
    pub compartment: String,
}

/// Maps model-local identifiers onto canonical ids using finalized tables.
#[derive(Debug, Clone, Copy)]
pub struct Canonicalizer<'t> {
    metabolites: &'t IdentifierTable,
    reactions: &'t IdentifierTable,
}

impl<'t> Canonicalizer<'t> {
    pub fn new(metabolites: &'t IdentifierTable, reactions: &'t IdentifierTable) -> Self {
        Self {
            metabolites,
            reactions,
        }
    }

    pub fn metabolite_table(&self) -> &'t IdentifierTable {
        self.metabolites
    }

    pub fn reaction_table(&self) -> &'t IdentifierTable {
        self.reactions
    }

    /// Resolves a metabolite identifier.
    ///
    /// Lookup order: the id itself (one leading underscore removed), the id
    /// without its compartment suffix, then every annotation value. Annotation
    /// keys are scanned in the order the caller's map yields them, and the
    /// first value that resolves wins.
    pub fn map(
        &self,
        local_id: &str,
        compartment_hint: Option<&str>,
        annotations: Option<&Annotations>,
    ) -> Option<CanonicalMetabolite> {
        let local_id = local_id.strip_prefix('_').unwrap_or(local_id);
        let suffix = split_compartment_suffix(local_id);

        let id = self
            .metabolites
            .lookup(local_id)
            .or_else(|| suffix.and_then(|(base, _)| self.metabolites.lookup(base)))
            .or_else(|| annotations.and_then(|a| self.map_annotations(a)))?;

        Some(CanonicalMetabolite {
            id,
            compartment: resolve_compartment(compartment_hint, suffix.map(|(_, s)| s)),
        })
    }

    pub fn map_metabolite(&self, metabolite: &Metabolite) -> Option<CanonicalMetabolite> {
        self.map(
            &metabolite.id,
            metabolite.compartment.as_deref(),
            Some(&metabolite.annotations),
        )
    }

    /// Resolves a reaction identifier, ignoring disambiguation fillers and a
    /// trailing localization suffix.
    pub fn map_reaction(&self, local_id: &str) -> Option<CanonicalId> {
        let cleaned: String = local_id.chars().filter(|&c| c != '~').collect();
        self.reactions
            .lookup(&cleaned)
            .or_else(|| self.reactions.lookup(strip_compartment_suffix(&cleaned)))
    }

    fn map_annotations(&self, annotations: &Annotations) -> Option<CanonicalId> {
        annotations
            .iter()
            .filter(|(key, _)| !SKIPPED_ANNOTATION_KEYS.contains(&key.as_str()))
            .find_map(|(_, value)| match value {
                AnnotationValue::Scalar(id) => self.lookup_annotation(id),
                AnnotationValue::List(ids) => ids.iter().find_map(|id| self.lookup_annotation(id)),
            })
    }

    fn lookup_annotation(&self, value: &str) -> Option<CanonicalId> {
        self.metabolites.lookup(value).or_else(|| {
            value
                .split_once(':')
                .and_then(|(_, bare)| self.metabolites.lookup(bare))
        })
    }
}

/// Picks the compartment code: the metabolite's own compartment if it is a
/// known alias, otherwise the id suffix, mapped when known and literal if not.
fn resolve_compartment(hint: Option<&str>, suffix: Option<&str>) -> String {
    if let Some(code) = hint.and_then(map_compartment) {
        return code.to_string();
    }
    match suffix {
        Some(suffix) => map_compartment(suffix).unwrap_or(suffix).to_string(),
        None => hint.map(str::trim).unwrap_or_default().to_string(),
    }
}
