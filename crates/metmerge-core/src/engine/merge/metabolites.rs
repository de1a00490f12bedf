use crate::core::models::annotation::merge_annotations;
use crate::core::models::ids::{CanonicalId, MetaboliteId};
use crate::core::models::metabolite::Metabolite;
use crate::core::models::model::MetabolicModel;
use crate::core::models::reaction::Reaction;
use crate::engine::canonicalize::{CanonicalMetabolite, Canonicalizer};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Identity of a metabolite in the merged model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaboliteKey {
    /// Resolved to a canonical compound in a compartment.
    Canonical(CanonicalMetabolite),
    /// Kept under the local identifier it has in its source model.
    Local(String),
}

impl MetaboliteKey {
    pub fn canonical_id(&self) -> Option<CanonicalId> {
        match self {
            MetaboliteKey::Canonical(canonical) => Some(canonical.id),
            MetaboliteKey::Local(_) => None,
        }
    }

    /// Boundary pseudo-metabolites carry the boundary marker at the end of
    /// their local id or compartment code.
    pub fn is_boundary(&self, suffix: &str) -> bool {
        match self {
            MetaboliteKey::Canonical(canonical) => canonical.compartment.ends_with(suffix),
            MetaboliteKey::Local(id) => id.ends_with(suffix),
        }
    }
}

/// One reaction participant expressed in merged-model keys.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Participant {
    pub key: MetaboliteKey,
    pub coefficient: f64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub(super) struct MergedMetabolite {
    pub metabolite: Metabolite,
    pub sources: BTreeSet<usize>,
}

#[derive(Debug, Clone)]
enum Binding {
    Bound(MetaboliteKey),
    /// The model already bound another of its metabolites to `canonical`.
    /// Reactions where both meet keep this one under its local id.
    Conflicted {
        canonical: MetaboliteKey,
        local: String,
    },
}

/// Where the metabolites of one input model ended up.
pub(super) struct ModelBindings<'m> {
    model: &'m MetabolicModel,
    index: usize,
    bindings: HashMap<MetaboliteId, Binding>,
}

pub(super) struct MetaboliteMerger<'t> {
    canonicalizer: Canonicalizer<'t>,
    entries: IndexMap<MetaboliteKey, MergedMetabolite>,
    /// Local ids that introduced each canonical key, in model order.
    claims: HashMap<CanonicalMetabolite, Vec<String>>,
}

impl<'t> MetaboliteMerger<'t> {
    pub fn new(canonicalizer: Canonicalizer<'t>) -> Self {
        Self {
            canonicalizer,
            entries: IndexMap::new(),
            claims: HashMap::new(),
        }
    }

    pub fn entries(&self) -> &IndexMap<MetaboliteKey, MergedMetabolite> {
        &self.entries
    }

    pub fn into_parts(
        self,
    ) -> (
        IndexMap<MetaboliteKey, MergedMetabolite>,
        HashMap<CanonicalMetabolite, Vec<String>>,
    ) {
        (self.entries, self.claims)
    }

    fn insert(&mut self, key: MetaboliteKey, metabolite: &Metabolite, index: usize) {
        self.entries.insert(
            key,
            MergedMetabolite {
                metabolite: metabolite.clone(),
                sources: BTreeSet::from([index]),
            },
        );
    }

    fn claim(
        &mut self,
        canonical: CanonicalMetabolite,
        metabolite: &Metabolite,
        index: usize,
    ) -> MetaboliteKey {
        self.claims
            .entry(canonical.clone())
            .or_default()
            .push(metabolite.id.clone());
        let key = MetaboliteKey::Canonical(canonical);
        self.insert(key.clone(), metabolite, index);
        key
    }

    fn contribute(&mut self, key: &MetaboliteKey, metabolite: &Metabolite, index: usize) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.sources.insert(index);
            merge_annotations(&mut entry.metabolite.annotations, &metabolite.annotations);
        }
    }

    /// Places every metabolite of model `index` into the merged set.
    ///
    /// The first model defines the template: all of its metabolites are kept,
    /// and a second metabolite resolving to an already present canonical key
    /// stays under its local id. Later models join existing entries where
    /// their local id or canonical key matches.
    pub fn add_model<'m>(&mut self, index: usize, model: &'m MetabolicModel) -> ModelBindings<'m> {
        let mut bindings = HashMap::with_capacity(model.metabolite_count());
        let model_ids: HashSet<&str> = model
            .metabolites_iter()
            .map(|(_, metabolite)| metabolite.id.as_str())
            .collect();

        for (id, metabolite) in model.metabolites_iter() {
            let canonical = self.canonicalizer.map_metabolite(metabolite);
            let binding = if index == 0 {
                self.bind_template(canonical, metabolite)
            } else {
                self.bind(index, canonical, metabolite, &model_ids)
            };
            bindings.insert(id, binding);
        }

        ModelBindings {
            model,
            index,
            bindings,
        }
    }

    fn is_claimed(&self, canonical: &CanonicalMetabolite) -> bool {
        self.entries.contains_key(&MetaboliteKey::Canonical(canonical.clone()))
    }

    fn bind_template(
        &mut self,
        canonical: Option<CanonicalMetabolite>,
        metabolite: &Metabolite,
    ) -> Binding {
        match canonical {
            Some(canonical) if !self.is_claimed(&canonical) => {
                Binding::Bound(self.claim(canonical, metabolite, 0))
            }
            _ => {
                let key = MetaboliteKey::Local(metabolite.id.clone());
                self.insert(key.clone(), metabolite, 0);
                Binding::Bound(key)
            }
        }
    }

    fn bind(
        &mut self,
        index: usize,
        canonical: Option<CanonicalMetabolite>,
        metabolite: &Metabolite,
        model_ids: &HashSet<&str>,
    ) -> Binding {
        let local = MetaboliteKey::Local(metabolite.id.clone());

        // Literal id matches take priority over canonical ones.
        let canonical = match canonical {
            Some(canonical) if !self.entries.contains_key(&local) => canonical,
            _ => {
                if self.entries.contains_key(&local) {
                    self.contribute(&local, metabolite, index);
                } else {
                    self.insert(local.clone(), metabolite, index);
                }
                return Binding::Bound(local);
            }
        };

        let key = MetaboliteKey::Canonical(canonical.clone());
        let Some(already_in_model) = self
            .entries
            .get(&key)
            .map(|entry| entry.sources.contains(&index))
        else {
            return Binding::Bound(self.claim(canonical, metabolite, index));
        };

        let claimed = self.claims.get(&canonical).map(Vec::as_slice).unwrap_or_default();
        let better_match = !claimed.contains(&metabolite.id)
            && claimed.iter().any(|id| model_ids.contains(id.as_str()));

        if better_match {
            self.insert(local.clone(), metabolite, index);
            Binding::Bound(local)
        } else if already_in_model {
            Binding::Conflicted {
                canonical: key,
                local: metabolite.id.clone(),
            }
        } else {
            self.contribute(&key, metabolite, index);
            Binding::Bound(key)
        }
    }

    /// Expresses the participants of `reaction` in merged-model keys.
    pub fn participants(
        &mut self,
        bindings: &ModelBindings<'_>,
        reaction: &Reaction,
    ) -> Vec<Participant> {
        let mut participants = Vec::with_capacity(reaction.stoichiometry.len());
        for &(id, coefficient) in &reaction.stoichiometry {
            let Some(metabolite) = bindings.model.metabolite(id) else {
                continue;
            };
            let key = match bindings.bindings.get(&id) {
                Some(Binding::Bound(key)) => key.clone(),
                Some(Binding::Conflicted { canonical, local }) => {
                    let clashes = reaction.stoichiometry.iter().any(|(other, _)| {
                        let bound_to_canonical = matches!(
                            bindings.bindings.get(other),
                            Some(Binding::Bound(key)) if key == canonical
                        );
                        *other != id && bound_to_canonical
                    });
                    if clashes {
                        let key = MetaboliteKey::Local(local.clone());
                        if !self.entries.contains_key(&key) {
                            self.insert(key.clone(), metabolite, bindings.index);
                        }
                        key
                    } else {
                        canonical.clone()
                    }
                }
                None => continue,
            };
            participants.push(Participant {
                key,
                coefficient,
                name: metabolite.name.clone(),
            });
        }
        participants
    }
}
