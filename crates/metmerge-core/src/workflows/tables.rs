use crate::core::identifiers::namespace::EntityKind;
use crate::core::identifiers::table::{IdentifierTable, TableError};
use crate::engine::canonicalize::Canonicalizer;
use std::path::{Path, PathBuf};

/// The finalized metabolite and reaction tables of one identifier space.
#[derive(Debug, Clone)]
pub struct IdentifierTables {
    pub metabolites: IdentifierTable,
    pub reactions: IdentifierTable,
}

impl IdentifierTables {
    pub fn new(metabolites: IdentifierTable, reactions: IdentifierTable) -> Self {
        Self {
            metabolites,
            reactions,
        }
    }

    pub fn empty() -> Self {
        Self::new(
            IdentifierTable::new(EntityKind::Metabolite),
            IdentifierTable::new(EntityKind::Reaction),
        )
    }

    pub fn get(&self, kind: EntityKind) -> &IdentifierTable {
        match kind {
            EntityKind::Metabolite => &self.metabolites,
            EntityKind::Reaction => &self.reactions,
        }
    }

    pub fn canonicalizer(&self) -> Canonicalizer<'_> {
        Canonicalizer::new(&self.metabolites, &self.reactions)
    }

    pub fn load(dir: &Path) -> Result<Self, TableError> {
        Ok(Self::new(
            IdentifierTable::load(dir, EntityKind::Metabolite)?,
            IdentifierTable::load(dir, EntityKind::Reaction)?,
        ))
    }

    /// Saves both tables into `dir`, creating it when needed.
    pub fn save(&self, dir: &Path) -> Result<(), TableError> {
        std::fs::create_dir_all(dir).map_err(|e| TableError::Io {
            path: dir.to_string_lossy().to_string(),
            source: e,
        })?;
        self.metabolites.save(dir)?;
        self.reactions.save(dir)
    }

    /// Writes the CSV reporting view of both tables, returning the files written.
    pub fn export_csv(&self, dir: &Path) -> Result<Vec<PathBuf>, TableError> {
        std::fs::create_dir_all(dir).map_err(|e| TableError::Io {
            path: dir.to_string_lossy().to_string(),
            source: e,
        })?;
        [&self.metabolites, &self.reactions]
            .into_iter()
            .map(|table| {
                let path = IdentifierTable::csv_path(dir, table.kind());
                table.export_csv(&path).map(|()| path)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identifiers::properties::PropertyBag;
    use crate::core::models::ids::CanonicalId;
    use std::collections::{BTreeMap, HashMap};
    use tempfile::tempdir;

    fn tables() -> IdentifierTables {
        let metabolites = IdentifierTable::from_parts(
            EntityKind::Metabolite,
            HashMap::from([("C00031".to_string(), CanonicalId::new(1))]),
            BTreeMap::from([(CanonicalId::new(1), PropertyBag::new())]),
        );
        IdentifierTables::new(metabolites, IdentifierTable::new(EntityKind::Reaction))
    }

    #[test]
    fn save_creates_directory_and_load_reads_it_back() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("tables");

        tables().save(&target).unwrap();
        let loaded = IdentifierTables::load(&target).unwrap();

        assert_eq!(loaded.metabolites.lookup("C00031"), Some(CanonicalId::new(1)));
        assert!(loaded.reactions.is_empty());
        assert_eq!(
            loaded.canonicalizer().map("C00031_c", None, None).map(|m| m.id),
            Some(CanonicalId::new(1))
        );
    }

    #[test]
    fn export_csv_writes_one_file_per_kind() {
        let dir = tempdir().unwrap();
        let written = tables().export_csv(dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|path| path.exists()));
    }

    #[test]
    fn load_fails_for_missing_tables() {
        let dir = tempdir().unwrap();
        assert!(IdentifierTables::load(dir.path()).is_err());
    }
}
