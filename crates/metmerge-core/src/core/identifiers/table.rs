use super::namespace::{EntityKind, Namespace};
use super::properties::PropertyBag;
use crate::core::models::ids::CanonicalId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Table file '{path}' holds {found} identifiers, expected {expected}")]
    KindMismatch {
        path: String,
        expected: EntityKind,
        found: EntityKind,
    },
    #[error("Identifier '{id}' in '{path}' points to canonical id {canonical} which has no properties")]
    DanglingEntry {
        path: String,
        id: String,
        canonical: CanonicalId,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    kind: EntityKind,
    entries: Vec<(String, CanonicalId)>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PropertyEntry {
    id: CanonicalId,
    properties: PropertyBag,
}

#[derive(Debug, Serialize, Deserialize)]
struct PropertiesFile {
    kind: EntityKind,
    entries: Vec<PropertyEntry>,
}

/// The finalized identifier space of one entity kind.
///
/// Bare database codes (namespace stripped) resolve to canonical ids, and every
/// canonical id owns a [`PropertyBag`]. Tables are read-only once built; the
/// merge phase only ever looks things up.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierTable {
    kind: EntityKind,
    index: HashMap<String, CanonicalId>,
    properties: BTreeMap<CanonicalId, PropertyBag>,
}

impl IdentifierTable {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            index: HashMap::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Assembles a table from already finalized parts.
    pub fn from_parts(
        kind: EntityKind,
        index: HashMap<String, CanonicalId>,
        properties: BTreeMap<CanonicalId, PropertyBag>,
    ) -> Self {
        Self {
            kind,
            index,
            properties,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn lookup(&self, bare_id: &str) -> Option<CanonicalId> {
        self.index.get(bare_id).copied()
    }

    pub fn properties(&self, id: CanonicalId) -> Option<&PropertyBag> {
        self.properties.get(&id)
    }

    /// The local part of the first identifier of `id` issued by `namespace`.
    pub fn id_in_namespace(&self, id: CanonicalId, namespace: &Namespace) -> Option<&str> {
        self.properties(id)
            .and_then(|bag| bag.id_in_namespace(namespace))
            .map(|raw| raw.local())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalId, &PropertyBag)> {
        self.properties.iter().map(|(id, bag)| (*id, bag))
    }

    /// The equivalence classes of bare identifiers, independent of the
    /// numeric canonical ids that label them.
    pub fn partition(&self) -> BTreeSet<BTreeSet<String>> {
        let mut classes: BTreeMap<CanonicalId, BTreeSet<String>> = BTreeMap::new();
        for (bare, id) in &self.index {
            classes.entry(*id).or_default().insert(bare.clone());
        }
        classes.into_values().collect()
    }

    pub fn index_path(dir: &Path, kind: EntityKind) -> PathBuf {
        dir.join(format!("{}-index.json", kind.file_stem()))
    }

    pub fn properties_path(dir: &Path, kind: EntityKind) -> PathBuf {
        dir.join(format!("{}-properties.json", kind.file_stem()))
    }

    pub fn csv_path(dir: &Path, kind: EntityKind) -> PathBuf {
        dir.join(format!("{}-table.csv", kind.file_stem()))
    }

    /// Writes the index and property store of this table into `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), TableError> {
        let index_path = Self::index_path(dir, self.kind);
        let mut entries: Vec<(String, CanonicalId)> = self
            .index
            .iter()
            .map(|(bare, id)| (bare.clone(), *id))
            .collect();
        entries.sort();
        write_json(
            &index_path,
            &IndexFile {
                kind: self.kind,
                entries,
            },
        )?;

        let properties_path = Self::properties_path(dir, self.kind);
        let entries = self
            .properties
            .iter()
            .map(|(id, bag)| PropertyEntry {
                id: *id,
                properties: bag.clone(),
            })
            .collect();
        write_json(
            &properties_path,
            &PropertiesFile {
                kind: self.kind,
                entries,
            },
        )
    }

    /// Reads a table previously written by [`IdentifierTable::save`].
    ///
    /// # Errors
    ///
    /// Fails when either file is missing or malformed, when a file holds the
    /// other entity kind, or when the index references an unknown canonical id.
    pub fn load(dir: &Path, kind: EntityKind) -> Result<Self, TableError> {
        let index_path = Self::index_path(dir, kind);
        let index_file: IndexFile = read_json(&index_path)?;
        check_kind(&index_path, kind, index_file.kind)?;

        let properties_path = Self::properties_path(dir, kind);
        let properties_file: PropertiesFile = read_json(&properties_path)?;
        check_kind(&properties_path, kind, properties_file.kind)?;

        let properties: BTreeMap<CanonicalId, PropertyBag> = properties_file
            .entries
            .into_iter()
            .map(|entry| (entry.id, entry.properties))
            .collect();

        let mut index = HashMap::with_capacity(index_file.entries.len());
        for (bare, id) in index_file.entries {
            if !properties.contains_key(&id) {
                return Err(TableError::DanglingEntry {
                    path: index_path.to_string_lossy().to_string(),
                    id: bare,
                    canonical: id,
                });
            }
            index.insert(bare, id);
        }

        Ok(Self {
            kind,
            index,
            properties,
        })
    }

    /// Writes the reporting view: one row per canonical id followed by its
    /// sorted raw identifiers.
    pub fn export_csv(&self, path: &Path) -> Result<(), TableError> {
        let csv_err = |source| TableError::Csv {
            path: path.to_string_lossy().to_string(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;

        for (id, bag) in &self.properties {
            let mut raw_ids: Vec<String> = bag.ids().iter().map(ToString::to_string).collect();
            raw_ids.sort();
            let mut row = Vec::with_capacity(raw_ids.len() + 1);
            row.push(id.to_string());
            row.extend(raw_ids);
            writer.write_record(&row).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| TableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}

fn check_kind(path: &Path, expected: EntityKind, found: EntityKind) -> Result<(), TableError> {
    if expected == found {
        Ok(())
    } else {
        Err(TableError::KindMismatch {
            path: path.to_string_lossy().to_string(),
            expected,
            found,
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), TableError> {
    let file = File::create(path).map_err(|e| TableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    serde_json::to_writer(BufWriter::new(file), value).map_err(|e| TableError::Json {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, TableError> {
    let file = File::open(path).map_err(|e| TableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| TableError::Json {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}
