use super::FeedFormat;
use crate::core::identifiers::namespace::EntityKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Feed '{path}' uses format '{format}', which does not describe {kind} identifiers")]
    KindMismatch {
        path: String,
        format: FeedFormat,
        kind: EntityKind,
    },
}

/// One feed file to ingest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FeedSpec {
    pub kind: EntityKind,
    pub format: FeedFormat,
    pub path: PathBuf,
}

/// The ordered list of feeds a table build ingests.
///
/// ```toml
/// [[feed]]
/// kind = "metabolite"
/// format = "metanetx-chem-prop"
/// path = "chem_prop.tsv"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedManifest {
    #[serde(default, rename = "feed")]
    pub feeds: Vec<FeedSpec>,
}

impl FeedManifest {
    /// Loads a manifest, resolving relative feed paths against the manifest's
    /// own directory.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let mut manifest: FeedManifest =
            toml::from_str(&content).map_err(|e| ManifestError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for feed in &mut manifest.feeds {
            if feed.path.is_relative() {
                feed.path = base.join(&feed.path);
            }
            if feed.format.entity_kind().is_some_and(|kind| kind != feed.kind) {
                return Err(ManifestError::KindMismatch {
                    path: feed.path.to_string_lossy().to_string(),
                    format: feed.format,
                    kind: feed.kind,
                });
            }
        }
        Ok(manifest)
    }

    /// Feeds describing `kind`, in manifest order.
    pub fn feeds_of(&self, kind: EntityKind) -> impl Iterator<Item = &FeedSpec> {
        self.feeds.iter().filter(move |feed| feed.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_resolves_relative_paths_and_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feeds.toml");
        fs::write(
            &path,
            r#"
            [[feed]]
            kind = "metabolite"
            format = "seed-compounds"
            path = "compounds.tsv"

            [[feed]]
            kind = "reaction"
            format = "seed-reactions"
            path = "/data/reactions.tsv"

            [[feed]]
            kind = "metabolite"
            format = "cross-references"
            path = "links.tsv"
            "#,
        )
        .unwrap();

        let manifest = FeedManifest::load(&path).unwrap();
        assert_eq!(manifest.feeds.len(), 3);
        assert_eq!(manifest.feeds[0].path, dir.path().join("compounds.tsv"));
        assert_eq!(manifest.feeds[1].path, PathBuf::from("/data/reactions.tsv"));

        let metabolite_formats: Vec<FeedFormat> = manifest
            .feeds_of(EntityKind::Metabolite)
            .map(|feed| feed.format)
            .collect();
        assert_eq!(
            metabolite_formats,
            vec![FeedFormat::SeedCompounds, FeedFormat::CrossReferences]
        );
    }

    #[test]
    fn load_rejects_format_of_the_wrong_kind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feeds.toml");
        fs::write(
            &path,
            "[[feed]]\nkind = \"reaction\"\nformat = \"chebi-names\"\npath = \"names.tsv\"\n",
        )
        .unwrap();

        let result = FeedManifest::load(&path);
        assert!(matches!(result, Err(ManifestError::KindMismatch { .. })));
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feeds.toml");
        fs::write(
            &path,
            "[[feed]]\nkind = \"reaction\"\nformat = \"records\"\npath = \"r.tsv\"\nurl = \"x\"\n",
        )
        .unwrap();

        assert!(matches!(FeedManifest::load(&path), Err(ManifestError::Toml { .. })));
    }
}
