//! Merging of metabolic models in the canonical identifier space.
//!
//! The first model acts as the template. Metabolites of later models join an
//! existing entry when their local id or their canonical compound in the same
//! compartment matches; reactions join when their participant key matches in
//! either direction. Objective reactions bypass deduplication and are
//! reconciled separately.

pub mod annotations;
mod metabolites;
mod naming;
pub mod objective;
pub mod provenance;
mod reactions;
pub mod similarity;

pub use metabolites::MetaboliteKey;
pub use provenance::Provenance;
pub use similarity::SimilarityMatrix;

use self::annotations::{extend_gene, extend_metabolite, extend_reaction};
use self::metabolites::{MergedMetabolite, MetaboliteMerger};
use self::objective::{ObjectiveReaction, merge_objectives, select_objective};
use self::reactions::{KeyRules, MergedReaction, ReactionMerger, ReactionOutcome};
use super::canonicalize::{CanonicalMetabolite, Canonicalizer};
use super::config::{MergeConfig, ObjectiveMode};
use super::error::EngineError;
use crate::core::identifiers::namespace::Namespace;
use crate::core::models::annotation::merge_annotations;
use crate::core::models::gene::Gene;
use crate::core::models::ids::MetaboliteId;
use crate::core::models::metabolite::Metabolite;
use crate::core::models::model::{MetabolicModel, ModelError};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Everything a merge produces besides the model itself.
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub model: MetabolicModel,
    pub similarity: SimilarityMatrix,
    /// Input metabolites that were folded into an entry of another model.
    pub metabolites_merged: usize,
    /// Input reactions that were folded into a kept reaction.
    pub reactions_merged: usize,
    pub metabolite_sources: Provenance,
    pub reaction_sources: Provenance,
}

pub struct MergeEngine<'a> {
    canonicalizer: Canonicalizer<'a>,
    config: &'a MergeConfig,
}

impl<'a> MergeEngine<'a> {
    pub fn new(canonicalizer: Canonicalizer<'a>, config: &'a MergeConfig) -> Self {
        Self {
            canonicalizer,
            config,
        }
    }

    /// Merges `models` in order into a single model.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoModels`] for an empty batch and
    /// [`EngineError::InvalidObjectiveSelection`] when the selected objective
    /// model does not exist.
    pub fn merge(&self, models: &[MetabolicModel]) -> Result<MergeResult, EngineError> {
        if models.is_empty() {
            return Err(EngineError::NoModels);
        }
        let selected_objective = match self.config.objective {
            ObjectiveMode::SelectOne(index) if index >= models.len() => {
                return Err(EngineError::InvalidObjectiveSelection {
                    index,
                    models: models.len(),
                });
            }
            ObjectiveMode::SelectOne(index) => Some(index),
            ObjectiveMode::MergeAll if models.len() > 1 => None,
            ObjectiveMode::MergeAll => Some(0),
        };
        info!(models = models.len(), "Merging models.");

        // === Phase 1: Metabolites and reactions, model by model ===
        let mut metabolites = MetaboliteMerger::new(self.canonicalizer);
        let mut reactions = ReactionMerger::new(
            KeyRules::new(self.config, &self.canonicalizer),
            self.config.filler,
        );
        let mut objectives: Vec<Vec<ObjectiveReaction>> = Vec::with_capacity(models.len());

        for (index, model) in models.iter().enumerate() {
            let bindings = metabolites.add_model(index, model);
            let mut model_objectives = Vec::new();
            let mut duplicates = 0usize;

            for (_, reaction) in model.reactions_iter() {
                let participants = metabolites.participants(&bindings, reaction);
                if reaction.is_objective() {
                    model_objectives.push(ObjectiveReaction {
                        reaction: reaction.clone(),
                        participants,
                    });
                } else if let ReactionOutcome::Duplicate(_) =
                    reactions.add(index, reaction, participants)
                {
                    duplicates += 1;
                }
            }

            debug!(
                model = model.id(),
                duplicate_reactions = duplicates,
                objective_reactions = model_objectives.len(),
                "Model folded into merge."
            );
            objectives.push(model_objectives);
        }

        let similarity = SimilarityMatrix::from_sources(
            models.len(),
            metabolites.entries().values().map(|entry| &entry.sources),
            reactions.entries().iter().map(|entry| &entry.sources),
        );

        // === Phase 2: Objective reconciliation ===
        let kept_reactions = reactions.entries().len();
        let objective_count: usize = objectives.iter().map(Vec::len).sum();
        let synthetic_objective = match selected_objective {
            None => match merge_objectives(&objectives) {
                Some(merged) => {
                    reactions.push(merged);
                    true
                }
                None => false,
            },
            Some(index) => {
                for objective in select_objective(objectives, index) {
                    reactions.push(objective);
                }
                false
            }
        };

        let input_metabolites: usize = models.iter().map(MetabolicModel::metabolite_count).sum();
        let input_reactions: usize = models.iter().map(MetabolicModel::reaction_count).sum();
        let metabolites_merged = input_metabolites.saturating_sub(metabolites.entries().len());
        let reactions_merged = (input_reactions + usize::from(synthetic_objective))
            .saturating_sub(kept_reactions + objective_count);

        // === Phase 3: Output identifiers and annotations ===
        let (entries, claims) = metabolites.into_parts();
        let (metabolite_entries, metabolite_sources) = self.name_metabolites(entries, &claims);
        let mut reaction_entries = reactions.into_entries();
        let reaction_sources = self.name_reactions(&mut reaction_entries);

        // === Phase 4: Assembly ===
        let (id, name) = naming::merged_identity(models, self.config);
        let mut merged = MetabolicModel::new(&id);
        merged.set_name(Some(name));

        let mut metabolite_ids: HashMap<MetaboliteKey, MetaboliteId> =
            HashMap::with_capacity(metabolite_entries.len());
        for (key, metabolite) in metabolite_entries {
            let slot = merged.add_metabolite(metabolite)?;
            metabolite_ids.insert(key, slot);
        }

        let genes = self.collect_genes(models, &reaction_entries);

        for MergedReaction {
            mut reaction,
            participants,
            ..
        } in reaction_entries
        {
            for (key, coefficient) in participants {
                let Some(&slot) = metabolite_ids.get(&key) else {
                    return Err(ModelError::UnknownParticipant {
                        reaction: reaction.id,
                    }
                    .into());
                };
                match reaction.stoichiometry.iter_mut().find(|(id, _)| *id == slot) {
                    Some((_, existing)) => *existing += coefficient,
                    None => reaction.stoichiometry.push((slot, coefficient)),
                }
            }
            reaction.stoichiometry.retain(|(_, coefficient)| *coefficient != 0.0);
            merged.add_reaction(reaction)?;
        }

        for gene in genes {
            merged.add_gene(gene)?;
        }

        let used_compartments: HashSet<String> = merged
            .metabolites_iter()
            .filter_map(|(_, metabolite)| metabolite.compartment.clone())
            .collect();
        for model in models {
            for (code, compartment_name) in model.compartments() {
                if used_compartments.contains(code) && !merged.compartments().contains_key(code) {
                    merged
                        .compartments_mut()
                        .insert(code.clone(), compartment_name.clone());
                }
            }
        }

        info!(
            metabolites = merged.metabolite_count(),
            reactions = merged.reaction_count(),
            genes = merged.gene_count(),
            metabolites_merged,
            reactions_merged,
            "Merge complete."
        );

        Ok(MergeResult {
            model: merged,
            similarity,
            metabolites_merged,
            reactions_merged,
            metabolite_sources,
            reaction_sources,
        })
    }

    /// Chooses the output id of every merged metabolite.
    ///
    /// A canonical entry is named after the local id that introduced it, a
    /// local entry keeps its id. With a target namespace, entries whose
    /// compound has an id there are renamed to it, compartment appended.
    fn name_metabolites(
        &self,
        entries: IndexMap<MetaboliteKey, MergedMetabolite>,
        claims: &HashMap<CanonicalMetabolite, Vec<String>>,
    ) -> (Vec<(MetaboliteKey, Metabolite)>, Provenance) {
        let table = self.canonicalizer.metabolite_table();
        let mut taken: HashSet<String> = entries
            .keys()
            .filter_map(|key| match key {
                MetaboliteKey::Local(id) => Some(id.clone()),
                MetaboliteKey::Canonical(_) => None,
            })
            .collect();
        let mut provenance = Provenance::new();
        let mut named = Vec::with_capacity(entries.len());

        for (key, entry) in entries {
            let MergedMetabolite {
                mut metabolite,
                sources,
            } = entry;
            let canonical = match &key {
                MetaboliteKey::Canonical(canonical) => Some(canonical.clone()),
                MetaboliteKey::Local(id) => {
                    self.canonicalizer.map(id, metabolite.compartment.as_deref(), None)
                }
            };

            if self.config.extend_annotations {
                if let Some(properties) = canonical.as_ref().and_then(|c| table.properties(c.id)) {
                    extend_metabolite(&mut metabolite, properties);
                }
            }

            let translated = match (&self.config.translate_to, &canonical) {
                (Some(namespace), Some(canonical)) => table
                    .id_in_namespace(canonical.id, namespace)
                    .map(|bare| with_compartment(bare, &canonical.compartment)),
                _ => None,
            };
            let current = match &key {
                MetaboliteKey::Local(id) => Some(id.as_str()),
                MetaboliteKey::Canonical(_) => None,
            };
            let desired = translated.unwrap_or_else(|| match &key {
                MetaboliteKey::Canonical(canonical) => claims
                    .get(canonical)
                    .and_then(|ids| ids.first())
                    .cloned()
                    .unwrap_or_else(|| metabolite.id.clone()),
                MetaboliteKey::Local(id) => id.clone(),
            });

            let id = if current == Some(desired.as_str()) {
                desired
            } else {
                let id = naming::unique_metabolite_id(&desired, &taken, self.config.filler);
                if let Some(current) = current {
                    taken.remove(current);
                }
                taken.insert(id.clone());
                id
            };

            provenance.insert(&id, sources);
            metabolite.id = id;
            named.push((key, metabolite));
        }
        (named, provenance)
    }

    /// Renames kept reactions into the target namespace and extends their
    /// annotations, returning their provenance under the final ids.
    fn name_reactions(&self, entries: &mut [MergedReaction]) -> Provenance {
        let table = self.canonicalizer.reaction_table();
        let mut taken: HashSet<String> = entries.iter().map(|e| e.reaction.id.clone()).collect();
        let mut provenance = Provenance::new();

        for entry in entries.iter_mut() {
            let reaction = &mut entry.reaction;
            let desired = match self.canonicalizer.map_reaction(&reaction.id) {
                Some(canonical) => {
                    if self.config.extend_annotations {
                        if let Some(properties) = table.properties(canonical) {
                            extend_reaction(reaction, properties);
                        }
                    }
                    self.config
                        .translate_to
                        .as_ref()
                        .and_then(|namespace| table.id_in_namespace(canonical, namespace))
                        .map(str::to_string)
                }
                None => self
                    .config
                    .translate_to
                    .as_ref()
                    .and_then(|namespace| self.translate_by_metabolite(&reaction.id, namespace)),
            };

            if let Some(desired) = desired.filter(|desired| *desired != reaction.id) {
                let id = naming::unique_reaction_id(&desired, &taken, self.config.filler);
                taken.remove(&reaction.id);
                taken.insert(id.clone());
                reaction.id = id;
            }
            provenance.insert(&reaction.id, entry.sources.clone());
        }
        provenance
    }

    /// Translates ids such as `EX_glc__D_e` that name a metabolite after a
    /// reaction-type prefix.
    fn translate_by_metabolite(&self, reaction_id: &str, namespace: &Namespace) -> Option<String> {
        let parts: Vec<&str> = reaction_id.split('_').collect();
        if parts.len() < 2 {
            return None;
        }
        let metabolite = self.canonicalizer.map(&parts[1..].join("_"), None, None)?;
        let bare = self
            .canonicalizer
            .metabolite_table()
            .id_in_namespace(metabolite.id, namespace)?;
        let mut id = format!("{}_{}", parts[0], bare);
        if parts.len() > 2 {
            id.push('_');
            id.push_str(parts[parts.len() - 1]);
        }
        Some(id)
    }

    /// Genes named by the kept reactions, taken from the first model defining
    /// them with annotations of later definitions merged in.
    fn collect_genes(&self, models: &[MetabolicModel], reactions: &[MergedReaction]) -> Vec<Gene> {
        let referenced: IndexSet<&str> = reactions
            .iter()
            .flat_map(|entry| entry.reaction.gene_ids())
            .collect();
        let mut genes: IndexMap<String, Gene> = IndexMap::with_capacity(referenced.len());

        for model in models {
            for (_, gene) in model.genes_iter() {
                if !referenced.contains(gene.id.as_str()) {
                    continue;
                }
                match genes.get_mut(&gene.id) {
                    Some(existing) => {
                        merge_annotations(&mut existing.annotations, &gene.annotations)
                    }
                    None => {
                        genes.insert(gene.id.clone(), gene.clone());
                    }
                }
            }
        }
        for id in referenced {
            genes.entry(id.to_string()).or_insert_with(|| Gene::new(id));
        }

        let mut genes: Vec<Gene> = genes.into_values().collect();
        if self.config.extend_annotations {
            genes.iter_mut().for_each(extend_gene);
        }
        genes
    }
}

fn with_compartment(bare: &str, compartment: &str) -> String {
    if compartment.is_empty() {
        bare.to_string()
    } else {
        format!("{}_{}", bare, compartment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identifiers::namespace::{EntityKind, RawId};
    use crate::core::identifiers::properties::PropertyBag;
    use crate::core::identifiers::table::IdentifierTable;
    use crate::core::models::ids::CanonicalId;
    use crate::core::models::reaction::Reaction;
    use std::collections::{BTreeMap, BTreeSet};

    fn table(kind: EntityKind, classes: &[(u64, &[(Namespace, &str)])]) -> IdentifierTable {
        let mut index = HashMap::new();
        let mut properties = BTreeMap::new();
        for (id, raw_ids) in classes {
            let mut bag = PropertyBag::new();
            for (namespace, local) in raw_ids.iter() {
                index.insert(local.to_string(), CanonicalId::new(*id));
                bag.insert_id(RawId::new(namespace.clone(), local));
            }
            properties.insert(CanonicalId::new(*id), bag);
        }
        IdentifierTable::from_parts(kind, index, properties)
    }

    fn tables() -> (IdentifierTable, IdentifierTable) {
        let metabolites = table(
            EntityKind::Metabolite,
            &[
                (
                    42,
                    &[
                        (Namespace::Kegg, "C00031"),
                        (Namespace::Bigg, "glc__D"),
                        (Namespace::Other("name".to_string()), "glc"),
                        (Namespace::Other("name".to_string()), "D-glucose"),
                    ],
                ),
                (6, &[(Namespace::Kegg, "C00668"), (Namespace::Bigg, "g6p")]),
                (7, &[(Namespace::Kegg, "C05345"), (Namespace::Bigg, "f6p")]),
                (8, &[(Namespace::Kegg, "C00002"), (Namespace::Bigg, "atp")]),
                (80, &[(Namespace::Kegg, "C00080"), (Namespace::Bigg, "h")]),
            ],
        );
        let reactions = table(
            EntityKind::Reaction,
            &[(
                11,
                &[
                    (Namespace::Bigg, "PGI"),
                    (Namespace::Metanetx, "MNXR102535"),
                    (Namespace::Kegg, "R02740"),
                ],
            )],
        );
        (metabolites, reactions)
    }

    struct ModelSpec<'s> {
        id: &'s str,
        metabolites: &'s [&'s str],
        reactions: &'s [(&'s str, &'s [(&'s str, f64)])],
    }

    fn build(spec: ModelSpec<'_>) -> MetabolicModel {
        let mut model = MetabolicModel::new(spec.id);
        model
            .compartments_mut()
            .insert("c".to_string(), "cytosol".to_string());
        model
            .compartments_mut()
            .insert("e".to_string(), "extracellular".to_string());
        for local in spec.metabolites {
            let compartment = local.rsplit('_').next().unwrap_or_default();
            model
                .add_metabolite(Metabolite::new(local, local).with_compartment(compartment))
                .unwrap();
        }
        for (id, participants) in spec.reactions {
            let mut reaction = Reaction::new(id, id);
            for (local, coefficient) in participants.iter() {
                let slot = model.find_metabolite_by_local_id(local).unwrap();
                reaction = reaction.with_participant(slot, *coefficient);
            }
            model.add_reaction(reaction).unwrap();
        }
        model
    }

    fn set_objective(model: &mut MetabolicModel, reaction: &str, coefficient: f64) {
        let slot = model.find_reaction_by_local_id(reaction).unwrap();
        model.reaction_mut(slot).unwrap().objective_coefficient = coefficient;
    }

    fn run(models: &[MetabolicModel], config: &MergeConfig) -> Result<MergeResult, EngineError> {
        let (metabolites, reactions) = tables();
        MergeEngine::new(Canonicalizer::new(&metabolites, &reactions), config).merge(models)
    }

    fn metabolite_ids(model: &MetabolicModel) -> Vec<String> {
        model.metabolites_iter().map(|(_, m)| m.id.clone()).collect()
    }

    fn reaction_ids(model: &MetabolicModel) -> Vec<String> {
        model.reactions_iter().map(|(_, r)| r.id.clone()).collect()
    }

    fn glycolysis_pair() -> Vec<MetabolicModel> {
        vec![
            build(ModelSpec {
                id: "a",
                metabolites: &["glc_c", "g6p_c"],
                reactions: &[("HEX1", &[("glc_c", -1.0), ("g6p_c", 1.0)])],
            }),
            build(ModelSpec {
                id: "b",
                metabolites: &["D-glucose_c", "g6p_c"],
                reactions: &[("HK", &[("D-glucose_c", -1.0), ("g6p_c", 1.0)])],
            }),
        ]
    }

    #[test]
    fn aliases_of_one_compound_become_one_metabolite() {
        let result = run(&glycolysis_pair(), &MergeConfig::default()).unwrap();

        assert_eq!(metabolite_ids(&result.model), vec!["glc_c", "g6p_c"]);
        assert_eq!(
            result.metabolite_sources.sources("glc_c"),
            Some(&BTreeSet::from([0, 1]))
        );
        assert_eq!(reaction_ids(&result.model), vec!["HEX1"]);
        assert_eq!(
            result.reaction_sources.sources("HEX1"),
            Some(&BTreeSet::from([0, 1]))
        );
        assert_eq!(result.metabolites_merged, 2);
        assert_eq!(result.reactions_merged, 1);
        assert_eq!(result.similarity.metabolite_distance(0, 1), Some(0.0));
        assert_eq!(result.similarity.reaction_distance(0, 1), Some(0.0));
        assert_eq!(result.model.id(), "merged_a_b");
        assert_eq!(result.model.compartments().len(), 1);
    }

    #[test]
    fn merging_is_deterministic() {
        let models = glycolysis_pair();
        let first = run(&models, &MergeConfig::default()).unwrap();
        let second = run(&models, &MergeConfig::default()).unwrap();

        assert_eq!(metabolite_ids(&first.model), metabolite_ids(&second.model));
        assert_eq!(reaction_ids(&first.model), reaction_ids(&second.model));
        assert_eq!(first.metabolite_sources, second.metabolite_sources);
        assert_eq!(first.reaction_sources, second.reaction_sources);
        assert_eq!(first.similarity, second.similarity);
    }

    #[test]
    fn reversed_reaction_is_recognized() {
        let models = vec![
            build(ModelSpec {
                id: "a",
                metabolites: &["g6p_c", "f6p_c"],
                reactions: &[("PGI", &[("g6p_c", -1.0), ("f6p_c", 1.0)])],
            }),
            build(ModelSpec {
                id: "b",
                metabolites: &["g6p_c", "f6p_c"],
                reactions: &[("PGI_rev", &[("f6p_c", -1.0), ("g6p_c", 1.0)])],
            }),
        ];
        let result = run(&models, &MergeConfig::default()).unwrap();

        assert_eq!(reaction_ids(&result.model), vec!["PGI"]);
        let (_, reaction) = result.model.reactions_iter().next().unwrap();
        assert_eq!(reaction.stoichiometry.len(), 2);
        assert_eq!(result.reactions_merged, 1);
    }

    #[test]
    fn proton_participation_only_matters_when_requested() {
        let models = vec![
            build(ModelSpec {
                id: "a",
                metabolites: &["atp_c", "g6p_c", "h_c"],
                reactions: &[("R", &[("atp_c", -1.0), ("g6p_c", 1.0), ("h_c", 1.0)])],
            }),
            build(ModelSpec {
                id: "b",
                metabolites: &["atp_c", "g6p_c"],
                reactions: &[("R2", &[("atp_c", -1.0), ("g6p_c", 1.0)])],
            }),
        ];

        let ignored = run(&models, &MergeConfig::default()).unwrap();
        assert_eq!(ignored.model.reaction_count(), 1);

        let config = MergeConfig {
            include_protonation: true,
            ..MergeConfig::default()
        };
        let counted = run(&models, &config).unwrap();
        assert_eq!(counted.model.reaction_count(), 2);
        assert!(counted.model.id().ends_with("_useprot"));
    }

    fn objective_pair() -> Vec<MetabolicModel> {
        let mut a = build(ModelSpec {
            id: "a",
            metabolites: &["atp_c", "g6p_c"],
            reactions: &[("BIOMASS_A", &[("atp_c", -1.0), ("g6p_c", 1.0)])],
        });
        set_objective(&mut a, "BIOMASS_A", 1.0);
        let mut b = build(ModelSpec {
            id: "b",
            metabolites: &["atp_c", "g6p_c"],
            reactions: &[("BIOMASS_B", &[("atp_c", -2.0), ("g6p_c", 2.0)])],
        });
        set_objective(&mut b, "BIOMASS_B", 1.0);
        vec![a, b]
    }

    #[test]
    fn merge_all_averages_objective_coefficients() {
        let result = run(&objective_pair(), &MergeConfig::default()).unwrap();

        assert_eq!(reaction_ids(&result.model), vec![objective::MERGED_OBJECTIVE_ID]);
        let (_, objective) = result.model.objective_reactions().next().unwrap();
        let coefficients: Vec<f64> = objective.stoichiometry.iter().map(|(_, c)| *c).collect();
        assert_eq!(coefficients, vec![-1.5, 1.5]);
        assert_eq!(
            result.reaction_sources.sources(objective::MERGED_OBJECTIVE_ID),
            Some(&BTreeSet::from([0, 1]))
        );
        assert_eq!(result.reactions_merged, 1);
    }

    #[test]
    fn select_one_keeps_that_models_objective() {
        let config = MergeConfig {
            objective: ObjectiveMode::SelectOne(1),
            ..MergeConfig::default()
        };
        let result = run(&objective_pair(), &config).unwrap();

        assert_eq!(reaction_ids(&result.model), vec!["BIOMASS_B"]);
        assert_eq!(result.reactions_merged, 0);
    }

    #[test]
    fn invalid_batches_are_rejected() {
        assert!(matches!(
            run(&[], &MergeConfig::default()),
            Err(EngineError::NoModels)
        ));
        let config = MergeConfig {
            objective: ObjectiveMode::SelectOne(2),
            ..MergeConfig::default()
        };
        assert!(matches!(
            run(&objective_pair(), &config),
            Err(EngineError::InvalidObjectiveSelection { index: 2, models: 2 })
        ));
    }

    #[test]
    fn translation_renames_metabolites_and_reactions() {
        let model = build(ModelSpec {
            id: "m",
            metabolites: &["C00668_c", "C05345_c", "C00031_e"],
            reactions: &[
                ("R02740", &[("C00668_c", -1.0), ("C05345_c", 1.0)]),
                ("EX_C00031_e", &[("C00031_e", -1.0)]),
            ],
        });
        let config = MergeConfig {
            translate_to: Some(Namespace::Bigg),
            extend_annotations: true,
            ..MergeConfig::default()
        };
        let result = run(&[model], &config).unwrap();

        assert_eq!(metabolite_ids(&result.model), vec!["g6p_c", "f6p_c", "glc__D_e"]);
        assert_eq!(reaction_ids(&result.model), vec!["PGI", "EX_glc__D_e"]);
        assert!(result.metabolite_sources.sources("glc__D_e").is_some());
        let (_, g6p) = result.model.metabolites_iter().next().unwrap();
        assert!(g6p.annotations.contains_key("kegg.compound"));
        assert!(result.model.id().ends_with("_trans_bigg"));
    }

    #[test]
    fn genes_follow_kept_reactions() {
        let mut a = build(ModelSpec {
            id: "a",
            metabolites: &["g6p_c", "f6p_c"],
            reactions: &[("PGI", &[("g6p_c", -1.0), ("f6p_c", 1.0)])],
        });
        let slot = a.find_reaction_by_local_id("PGI").unwrap();
        a.reaction_mut(slot).unwrap().gene_rule = "b4025".to_string();
        a.add_gene(Gene::new("b4025")).unwrap();
        a.add_gene(Gene::new("unused")).unwrap();

        let mut b = build(ModelSpec {
            id: "b",
            metabolites: &["g6p_c", "f6p_c"],
            reactions: &[("PGI", &[("g6p_c", -1.0), ("f6p_c", 1.0)])],
        });
        let slot = b.find_reaction_by_local_id("PGI").unwrap();
        b.reaction_mut(slot).unwrap().gene_rule = "G_1".to_string();

        let result = run(&[a, b], &MergeConfig::default()).unwrap();
        let (_, reaction) = result.model.reactions_iter().next().unwrap();
        assert_eq!(reaction.gene_rule, "b4025 or G_1");
        let genes: Vec<&str> = result.model.genes_iter().map(|(_, g)| g.id.as_str()).collect();
        assert_eq!(genes, vec!["b4025", "G_1"]);
    }
}
