use super::gene::Gene;
use super::ids::{GeneId, MetaboliteId, ReactionId};
use super::metabolite::Metabolite;
use super::reaction::Reaction;
use indexmap::IndexMap;
use slotmap::SlotMap;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ModelError {
    #[error("Duplicate metabolite identifier '{0}'")]
    DuplicateMetabolite(String),
    #[error("Duplicate reaction identifier '{0}'")]
    DuplicateReaction(String),
    #[error("Duplicate gene identifier '{0}'")]
    DuplicateGene(String),
    #[error("Reaction '{reaction}' references a metabolite that is not part of the model")]
    UnknownParticipant { reaction: String },
    #[error("Unknown metabolite identifier '{0}'")]
    UnknownMetabolite(String),
    #[error("Unknown reaction identifier '{0}'")]
    UnknownReaction(String),
}

/// A genome-scale metabolic model: metabolites, reactions over them, and the
/// genes named by the reactions' gene associations.
///
/// Entities are kept in insertion order; every iterator yields them in the
/// order they were added, which the merge engine relies on for its
/// tie-breaking rules.
#[derive(Debug, Clone, Default)]
pub struct MetabolicModel {
    /// Model identifier as found in the source file.
    id: String,
    /// Optional human-readable model name.
    name: Option<String>,
    metabolites: SlotMap<MetaboliteId, Metabolite>,
    reactions: SlotMap<ReactionId, Reaction>,
    genes: SlotMap<GeneId, Gene>,
    metabolite_order: Vec<MetaboliteId>,
    reaction_order: Vec<ReactionId>,
    gene_order: Vec<GeneId>,
    /// Lookup from local metabolite identifier to its slot.
    metabolite_index: HashMap<String, MetaboliteId>,
    /// Lookup from local reaction identifier to its slot.
    reaction_index: HashMap<String, ReactionId>,
    gene_index: HashMap<String, GeneId>,
    /// Compartment code to compartment name.
    compartments: IndexMap<String, String>,
}

impl MetabolicModel {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Returns the model name, falling back to its identifier.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }

    /// Adds a metabolite to the model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateMetabolite`] if another metabolite already
    /// uses the same local identifier.
    pub fn add_metabolite(&mut self, metabolite: Metabolite) -> Result<MetaboliteId, ModelError> {
        if self.metabolite_index.contains_key(&metabolite.id) {
            return Err(ModelError::DuplicateMetabolite(metabolite.id));
        }
        let local_id = metabolite.id.clone();
        let id = self.metabolites.insert(metabolite);
        self.metabolite_order.push(id);
        self.metabolite_index.insert(local_id, id);
        Ok(id)
    }

    /// Adds a reaction whose participants must already belong to this model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateReaction`] for a repeated identifier and
    /// [`ModelError::UnknownParticipant`] when a participant is not a metabolite
    /// of this model.
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<ReactionId, ModelError> {
        if self.reaction_index.contains_key(&reaction.id) {
            return Err(ModelError::DuplicateReaction(reaction.id));
        }
        if reaction
            .stoichiometry
            .iter()
            .any(|(metabolite, _)| !self.metabolites.contains_key(*metabolite))
        {
            return Err(ModelError::UnknownParticipant {
                reaction: reaction.id,
            });
        }
        let local_id = reaction.id.clone();
        let id = self.reactions.insert(reaction);
        self.reaction_order.push(id);
        self.reaction_index.insert(local_id, id);
        Ok(id)
    }

    pub fn add_gene(&mut self, gene: Gene) -> Result<GeneId, ModelError> {
        if self.gene_index.contains_key(&gene.id) {
            return Err(ModelError::DuplicateGene(gene.id));
        }
        let local_id = gene.id.clone();
        let id = self.genes.insert(gene);
        self.gene_order.push(id);
        self.gene_index.insert(local_id, id);
        Ok(id)
    }

    pub fn metabolite(&self, id: MetaboliteId) -> Option<&Metabolite> {
        self.metabolites.get(id)
    }

    pub fn metabolite_mut(&mut self, id: MetaboliteId) -> Option<&mut Metabolite> {
        self.metabolites.get_mut(id)
    }

    pub fn reaction(&self, id: ReactionId) -> Option<&Reaction> {
        self.reactions.get(id)
    }

    pub fn reaction_mut(&mut self, id: ReactionId) -> Option<&mut Reaction> {
        self.reactions.get_mut(id)
    }

    pub fn gene_mut(&mut self, id: GeneId) -> Option<&mut Gene> {
        self.genes.get_mut(id)
    }

    pub fn find_metabolite_by_local_id(&self, local_id: &str) -> Option<MetaboliteId> {
        self.metabolite_index.get(local_id).copied()
    }

    pub fn find_reaction_by_local_id(&self, local_id: &str) -> Option<ReactionId> {
        self.reaction_index.get(local_id).copied()
    }

    pub fn find_gene_by_local_id(&self, local_id: &str) -> Option<GeneId> {
        self.gene_index.get(local_id).copied()
    }

    pub fn metabolites_iter(&self) -> impl Iterator<Item = (MetaboliteId, &Metabolite)> {
        self.metabolite_order
            .iter()
            .filter_map(|&id| self.metabolites.get(id).map(|m| (id, m)))
    }

    pub fn reactions_iter(&self) -> impl Iterator<Item = (ReactionId, &Reaction)> {
        self.reaction_order
            .iter()
            .filter_map(|&id| self.reactions.get(id).map(|r| (id, r)))
    }

    pub fn genes_iter(&self) -> impl Iterator<Item = (GeneId, &Gene)> {
        self.gene_order
            .iter()
            .filter_map(|&id| self.genes.get(id).map(|g| (id, g)))
    }

    /// Reactions carrying a non-zero objective coefficient.
    pub fn objective_reactions(&self) -> impl Iterator<Item = (ReactionId, &Reaction)> {
        self.reactions_iter().filter(|(_, r)| r.is_objective())
    }

    /// Reactions in which the given metabolite participates.
    pub fn reactions_of(
        &self,
        metabolite: MetaboliteId,
    ) -> impl Iterator<Item = (ReactionId, &Reaction)> {
        self.reactions_iter()
            .filter(move |(_, r)| r.stoichiometry.iter().any(|(m, _)| *m == metabolite))
    }

    pub fn metabolite_count(&self) -> usize {
        self.metabolite_order.len()
    }

    pub fn reaction_count(&self) -> usize {
        self.reaction_order.len()
    }

    pub fn gene_count(&self) -> usize {
        self.gene_order.len()
    }

    pub fn compartments(&self) -> &IndexMap<String, String> {
        &self.compartments
    }

    pub fn compartments_mut(&mut self) -> &mut IndexMap<String, String> {
        &mut self.compartments
    }

    /// Changes the local identifier of a metabolite, keeping the lookup index in sync.
    pub fn rename_metabolite(&mut self, id: MetaboliteId, new_id: &str) -> Result<(), ModelError> {
        if self.metabolite_index.get(new_id).is_some_and(|&existing| existing != id) {
            return Err(ModelError::DuplicateMetabolite(new_id.to_string()));
        }
        let metabolite = self
            .metabolites
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownMetabolite(new_id.to_string()))?;
        self.metabolite_index.remove(&metabolite.id);
        metabolite.id = new_id.to_string();
        self.metabolite_index.insert(new_id.to_string(), id);
        Ok(())
    }

    /// Changes the local identifier of a reaction, keeping the lookup index in sync.
    pub fn rename_reaction(&mut self, id: ReactionId, new_id: &str) -> Result<(), ModelError> {
        if self.reaction_index.get(new_id).is_some_and(|&existing| existing != id) {
            return Err(ModelError::DuplicateReaction(new_id.to_string()));
        }
        let reaction = self
            .reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownReaction(new_id.to_string()))?;
        self.reaction_index.remove(&reaction.id);
        reaction.id = new_id.to_string();
        self.reaction_index.insert(new_id.to_string(), id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glycolysis_fragment() -> (MetabolicModel, MetaboliteId, MetaboliteId) {
        let mut model = MetabolicModel::new("fragment");
        let g6p = model
            .add_metabolite(Metabolite::new("g6p_c", "D-Glucose 6-phosphate").with_compartment("c"))
            .unwrap();
        let f6p = model
            .add_metabolite(
                Metabolite::new("f6p_c", "D-Fructose 6-phosphate").with_compartment("c"),
            )
            .unwrap();
        model
            .add_reaction(
                Reaction::new("PGI", "Glucose-6-phosphate isomerase")
                    .with_participant(g6p, -1.0)
                    .with_participant(f6p, 1.0),
            )
            .unwrap();
        (model, g6p, f6p)
    }

    #[test]
    fn add_metabolite_rejects_duplicate_identifiers() {
        let (mut model, _, _) = glycolysis_fragment();
        let result = model.add_metabolite(Metabolite::new("g6p_c", ""));
        assert_eq!(result, Err(ModelError::DuplicateMetabolite("g6p_c".to_string())));
    }

    #[test]
    fn add_reaction_rejects_foreign_participants() {
        let (mut model, g6p, _) = glycolysis_fragment();

        let result = model.add_reaction(
            Reaction::new("BAD", "")
                .with_participant(g6p, -1.0)
                .with_participant(MetaboliteId::default(), 1.0),
        );
        assert!(matches!(result, Err(ModelError::UnknownParticipant { .. })));
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let (model, g6p, f6p) = glycolysis_fragment();
        let ids: Vec<_> = model.metabolites_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![g6p, f6p]);
        assert_eq!(model.reactions_of(g6p).count(), 1);
    }

    #[test]
    fn rename_metabolite_updates_lookup() {
        let (mut model, g6p, _) = glycolysis_fragment();
        model.rename_metabolite(g6p, "glc6p_c").unwrap();
        assert_eq!(model.find_metabolite_by_local_id("glc6p_c"), Some(g6p));
        assert_eq!(model.find_metabolite_by_local_id("g6p_c"), None);
        assert!(model.rename_metabolite(g6p, "f6p_c").is_err());
    }
}
