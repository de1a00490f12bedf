use super::metabolites::{MetaboliteKey, Participant};
use super::reactions::MergedReaction;
use crate::core::models::reaction::Reaction;
use indexmap::IndexMap;
use std::collections::BTreeSet;

pub const MERGED_OBJECTIVE_ID: &str = "merged-objectives";
const MERGED_OBJECTIVE_NAME: &str = "Merged all objectives";

/// An objective reaction withheld from deduplication, with its participants
/// already expressed in merged-model keys.
#[derive(Debug, Clone)]
pub(super) struct ObjectiveReaction {
    pub reaction: Reaction,
    pub participants: Vec<Participant>,
}

impl ObjectiveReaction {
    fn into_merged(self, index: usize) -> MergedReaction {
        let participants = self
            .participants
            .into_iter()
            .map(|p| (p.key, p.coefficient))
            .collect();
        MergedReaction::new(&self.reaction, participants, BTreeSet::from([index]))
    }
}

/// Combines the objective reactions of all models into one synthetic reaction.
///
/// Every participant of any objective joins the result with the arithmetic
/// mean of the coefficients it has in the objective reactions containing it.
/// Returns `None` when no objective has participants.
pub(super) fn merge_objectives(objectives: &[Vec<ObjectiveReaction>]) -> Option<MergedReaction> {
    let mut name = MERGED_OBJECTIVE_NAME.to_string();
    let mut coefficients: IndexMap<MetaboliteKey, Vec<f64>> = IndexMap::new();
    let mut sources = BTreeSet::new();

    for (index, reactions) in objectives.iter().enumerate() {
        for objective in reactions {
            sources.insert(index);
            name.push_str("; ");
            name.push_str(&objective.reaction.name);
            for participant in &objective.participants {
                coefficients
                    .entry(participant.key.clone())
                    .or_default()
                    .push(participant.coefficient);
            }
        }
    }

    if coefficients.is_empty() {
        return None;
    }

    let participants = coefficients
        .into_iter()
        .map(|(key, values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (key, mean)
        })
        .collect();
    let reaction = Reaction::new(MERGED_OBJECTIVE_ID, &name).with_objective_coefficient(1.0);
    Some(MergedReaction::new(&reaction, participants, sources))
}

/// Takes over the objective reactions of model `index` unchanged.
pub(super) fn select_objective(
    objectives: Vec<Vec<ObjectiveReaction>>,
    index: usize,
) -> Vec<MergedReaction> {
    objectives
        .into_iter()
        .nth(index)
        .unwrap_or_default()
        .into_iter()
        .map(|objective| objective.into_merged(index))
        .collect()
}
