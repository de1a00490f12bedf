use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// Which input models contributed each entity of a merged model, keyed by the
/// entity's identifier in the merged model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Provenance {
    sources: IndexMap<String, BTreeSet<usize>>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, sources: BTreeSet<usize>) {
        self.sources.entry(id.to_string()).or_default().extend(sources);
    }

    pub fn sources(&self, id: &str) -> Option<&BTreeSet<usize>> {
        self.sources.get(id)
    }

    /// Identifiers of the entities model `index` contributed to.
    pub fn contributed_by(&self, index: usize) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .filter(move |(_, sources)| sources.contains(&index))
            .map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<usize>)> {
        self.sources.iter().map(|(id, sources)| (id.as_str(), sources))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
