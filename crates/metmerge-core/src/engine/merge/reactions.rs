use super::metabolites::{MetaboliteKey, Participant};
use crate::core::models::annotation::merge_annotations;
use crate::core::models::ids::CanonicalId;
use crate::core::models::reaction::Reaction;
use crate::engine::canonicalize::Canonicalizer;
use crate::engine::config::MergeConfig;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Direction-sensitive identity of a reaction: participants with their roles.
/// Roles are stored as the bit pattern of the (signed) coefficient.
pub(super) type ReactionKey = BTreeSet<(MetaboliteKey, u64)>;

/// Which participants count towards a reaction's identity, and how.
#[derive(Debug, Clone)]
pub(super) struct KeyRules {
    exact_stoichiometry: bool,
    include_protonation: bool,
    proton: Option<CanonicalId>,
    boundary_suffix: String,
    proton_motive_force_name: String,
}

impl KeyRules {
    pub fn new(config: &MergeConfig, canonicalizer: &Canonicalizer<'_>) -> Self {
        Self {
            exact_stoichiometry: config.exact_stoichiometry,
            include_protonation: config.include_protonation,
            proton: canonicalizer
                .metabolite_table()
                .lookup(&config.proton_identifier),
            boundary_suffix: config.boundary_suffix.clone(),
            proton_motive_force_name: config.proton_motive_force_name.clone(),
        }
    }

    fn ignores(&self, participant: &Participant) -> bool {
        if !self.include_protonation {
            let is_proton = self
                .proton
                .is_some_and(|proton| participant.key.canonical_id() == Some(proton));
            if is_proton || participant.name == self.proton_motive_force_name {
                return true;
            }
        }
        participant.coefficient == 0.0 || participant.key.is_boundary(&self.boundary_suffix)
    }

    /// The forward key and the key of the fully reversed reaction.
    pub fn keys(&self, participants: &[Participant]) -> (ReactionKey, ReactionKey) {
        let mut forward = ReactionKey::new();
        let mut reverse = ReactionKey::new();
        for participant in participants.iter().filter(|p| !self.ignores(p)) {
            let role = if self.exact_stoichiometry {
                participant.coefficient
            } else {
                participant.coefficient.signum()
            };
            forward.insert((participant.key.clone(), role_bits(role)));
            reverse.insert((participant.key.clone(), role_bits(-role)));
        }
        (forward, reverse)
    }
}

// Adding zero folds -0.0 into 0.0 so equal roles share one bit pattern.
fn role_bits(role: f64) -> u64 {
    (role + 0.0).to_bits()
}

#[derive(Debug, Clone)]
pub(super) struct MergedReaction {
    /// The kept reaction; its stoichiometry lives in `participants`.
    pub reaction: Reaction,
    pub participants: Vec<(MetaboliteKey, f64)>,
    pub sources: BTreeSet<usize>,
}

impl MergedReaction {
    pub fn new(
        reaction: &Reaction,
        participants: Vec<(MetaboliteKey, f64)>,
        sources: BTreeSet<usize>,
    ) -> Self {
        let mut reaction = reaction.clone();
        reaction.stoichiometry.clear();
        Self {
            reaction,
            participants,
            sources,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReactionOutcome {
    Kept(usize),
    Duplicate(usize),
}

pub(super) struct ReactionMerger {
    rules: KeyRules,
    filler: char,
    entries: Vec<MergedReaction>,
    keys: HashMap<ReactionKey, usize>,
    ids: HashSet<String>,
}

impl ReactionMerger {
    pub fn new(rules: KeyRules, filler: char) -> Self {
        Self {
            rules,
            filler,
            entries: Vec::new(),
            keys: HashMap::new(),
            ids: HashSet::new(),
        }
    }

    pub fn entries(&self) -> &[MergedReaction] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<MergedReaction> {
        self.entries
    }

    /// Adds a reaction of model `index`.
    ///
    /// Reactions of the first model are always kept. A later reaction whose
    /// forward or reversed key matches a kept one only contributes its model
    /// index, annotations and gene association to it.
    pub fn add(
        &mut self,
        index: usize,
        reaction: &Reaction,
        participants: Vec<Participant>,
    ) -> ReactionOutcome {
        let (forward, reverse) = self.rules.keys(&participants);

        if index > 0 {
            let existing = self.keys.get(&forward).or_else(|| self.keys.get(&reverse)).copied();
            if let Some(slot) = existing {
                let entry = &mut self.entries[slot];
                entry.sources.insert(index);
                merge_annotations(&mut entry.reaction.annotations, &reaction.annotations);
                entry.reaction.add_gene_rule(&reaction.gene_rule);
                return ReactionOutcome::Duplicate(slot);
            }
        }

        let participants = participants
            .into_iter()
            .map(|p| (p.key, p.coefficient))
            .collect();
        let slot = self.push(MergedReaction::new(reaction, participants, BTreeSet::from([index])));
        self.keys.entry(forward).or_insert(slot);
        ReactionOutcome::Kept(slot)
    }

    /// Keeps a reaction without registering its key, renaming it when its id
    /// is already taken.
    pub fn push(&mut self, mut merged: MergedReaction) -> usize {
        while self.ids.contains(&merged.reaction.id) {
            merged.reaction.id.push(self.filler);
        }
        self.ids.insert(merged.reaction.id.clone());
        self.entries.push(merged);
        self.entries.len() - 1
    }
}
