//! Readers turning database dumps into identifier records.
//!
//! Every supported dump layout is a [`FeedFormat`]. Reading a feed yields a
//! list of [`FeedRecord`]s in ingestion order plus the rows that could not be
//! parsed; a single bad row never aborts the file.

mod bigg;
mod chebi;
mod generic;
mod manifest;
mod metanetx;
mod seed;

use crate::core::identifiers::namespace::{EntityKind, RawId};
use crate::core::identifiers::properties::PropertyBag;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub use generic::{CrossReferenceRow, PrimaryRecordRow};
pub use manifest::{FeedManifest, FeedSpec, ManifestError};

/// One unit of identifier knowledge read from a feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRecord {
    /// A database entry: its own identifier first, then co-listed identifiers
    /// from the same source, plus the properties the entry states.
    Primary {
        ids: Vec<RawId>,
        properties: PropertyBag,
    },
    /// Claims that `others` denote the same entity as `source`.
    CrossReference { source: RawId, others: Vec<RawId> },
}

impl FeedRecord {
    pub fn primary(ids: Vec<RawId>, properties: PropertyBag) -> Self {
        FeedRecord::Primary { ids, properties }
    }

    pub fn cross_reference(source: RawId, others: Vec<RawId>) -> Self {
        FeedRecord::CrossReference { source, others }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedFormat {
    /// Neutral primary-record table with named columns.
    Records,
    /// Neutral two-column `source`/`other` cross-reference table.
    CrossReferences,
    MetanetxChemProp,
    MetanetxChemXref,
    MetanetxChemDepr,
    BiggMetabolites,
    SeedCompounds,
    SeedCompoundAliases,
    ChebiNames,
    ChebiStructures,
    MetanetxReacProp,
    MetanetxReacXref,
    SeedReactions,
    SeedReactionAliases,
    SeedReactionPathways,
    BiggReactions,
}

impl FeedFormat {
    pub const ALL: [FeedFormat; 16] = [
        FeedFormat::Records,
        FeedFormat::CrossReferences,
        FeedFormat::MetanetxChemProp,
        FeedFormat::MetanetxChemXref,
        FeedFormat::MetanetxChemDepr,
        FeedFormat::BiggMetabolites,
        FeedFormat::SeedCompounds,
        FeedFormat::SeedCompoundAliases,
        FeedFormat::ChebiNames,
        FeedFormat::ChebiStructures,
        FeedFormat::MetanetxReacProp,
        FeedFormat::MetanetxReacXref,
        FeedFormat::SeedReactions,
        FeedFormat::SeedReactionAliases,
        FeedFormat::SeedReactionPathways,
        FeedFormat::BiggReactions,
    ];

    /// The entity kind a database-specific layout describes; `None` for the
    /// neutral layouts, which fit either kind.
    pub fn entity_kind(self) -> Option<EntityKind> {
        match self {
            FeedFormat::Records | FeedFormat::CrossReferences => None,
            FeedFormat::MetanetxChemProp
            | FeedFormat::MetanetxChemXref
            | FeedFormat::MetanetxChemDepr
            | FeedFormat::BiggMetabolites
            | FeedFormat::SeedCompounds
            | FeedFormat::SeedCompoundAliases
            | FeedFormat::ChebiNames
            | FeedFormat::ChebiStructures => Some(EntityKind::Metabolite),
            FeedFormat::MetanetxReacProp
            | FeedFormat::MetanetxReacXref
            | FeedFormat::SeedReactions
            | FeedFormat::SeedReactionAliases
            | FeedFormat::SeedReactionPathways
            | FeedFormat::BiggReactions => Some(EntityKind::Reaction),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeedFormat::Records => "records",
            FeedFormat::CrossReferences => "cross-references",
            FeedFormat::MetanetxChemProp => "metanetx-chem-prop",
            FeedFormat::MetanetxChemXref => "metanetx-chem-xref",
            FeedFormat::MetanetxChemDepr => "metanetx-chem-depr",
            FeedFormat::BiggMetabolites => "bigg-metabolites",
            FeedFormat::SeedCompounds => "seed-compounds",
            FeedFormat::SeedCompoundAliases => "seed-compound-aliases",
            FeedFormat::ChebiNames => "chebi-names",
            FeedFormat::ChebiStructures => "chebi-structures",
            FeedFormat::MetanetxReacProp => "metanetx-reac-prop",
            FeedFormat::MetanetxReacXref => "metanetx-reac-xref",
            FeedFormat::SeedReactions => "seed-reactions",
            FeedFormat::SeedReactionAliases => "seed-reaction-aliases",
            FeedFormat::SeedReactionPathways => "seed-reaction-pathways",
            FeedFormat::BiggReactions => "bigg-reactions",
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            FeedFormat::ChebiStructures => b',',
            _ => b'\t',
        }
    }

    // MetaNetX dumps carry their column header as a comment line.
    fn has_header(self) -> bool {
        !matches!(
            self,
            FeedFormat::MetanetxChemProp
                | FeedFormat::MetanetxChemXref
                | FeedFormat::MetanetxChemDepr
                | FeedFormat::MetanetxReacProp
                | FeedFormat::MetanetxReacXref
        )
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown feed format: '{0}'")]
pub struct ParseFeedFormatError(String);

impl FromStr for FeedFormat {
    type Err = ParseFeedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        FeedFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| ParseFeedFormatError(s.to_string()))
    }
}

/// A whole feed could not be read.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to open feed '{path}': {source}")]
    Open { path: PathBuf, source: csv::Error },
    #[error("Failed to read feed '{path}': {source}")]
    Read { path: PathBuf, source: csv::Error },
    #[error("File I/O error for feed '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RecordParseErrorKind {
    #[error("missing column {0}")]
    MissingColumn(usize),
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },
    #[error("malformed row: {0}")]
    Malformed(String),
}

/// One row of a feed could not be parsed; the row is skipped.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("line {line}: {kind}")]
pub struct RecordParseError {
    pub line: u64,
    pub kind: RecordParseErrorKind,
}

/// Everything read from one feed file.
#[derive(Debug, Default, Clone)]
pub struct FeedContents {
    pub records: Vec<FeedRecord>,
    pub rejected: Vec<RecordParseError>,
}

/// State shared by the row parsers of one file.
#[derive(Debug, Default)]
pub(crate) struct FeedContext {
    /// Release tag announced in a `#VERSION` comment, if any.
    release: Option<String>,
}

pub(crate) fn column(row: &StringRecord, index: usize) -> Result<&str, RecordParseErrorKind> {
    row.get(index)
        .map(str::trim)
        .ok_or(RecordParseErrorKind::MissingColumn(index))
}

pub(crate) fn parse_raw_id(value: &str) -> Result<RawId, RecordParseErrorKind> {
    value
        .parse()
        .map_err(|_| RecordParseErrorKind::InvalidIdentifier(value.to_string()))
}

/// Splits a delimited list cell, dropping blanks.
pub(crate) fn split_list<'a>(cell: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    cell.split(separator).map(str::trim).filter(|s| !s.is_empty())
}

/// Reads and parses one feed file.
///
/// Primary records are returned ahead of cross references, each group in file
/// order, so every cross-referenced source has been seen when it is applied.
///
/// # Errors
///
/// Returns a [`FeedError`] when the file cannot be opened or read. Rows that
/// fail to parse are reported in [`FeedContents::rejected`] instead.
pub fn read_feed(path: &Path, format: FeedFormat) -> Result<FeedContents, FeedError> {
    let context = FeedContext {
        release: if format == FeedFormat::MetanetxChemDepr {
            metanetx::release_version(path).map_err(|e| FeedError::Io {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            None
        },
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(format.has_header())
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| FeedError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

    let headers = if format.has_header() {
        Some(
            reader
                .headers()
                .map_err(|e| FeedError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })?
                .clone(),
        )
    } else {
        None
    };

    let mut primaries = Vec::new();
    let mut cross_references = Vec::new();
    let mut rejected = Vec::new();

    for row in reader.records() {
        let parsed = row.map(|r| {
            let line = r.position().map_or(0, |p| p.line());
            parse_row(format, &r, headers.as_ref(), &context)
                .map_err(|kind| RecordParseError { line, kind })
        });
        handle_row(
            path,
            parsed,
            &mut primaries,
            &mut cross_references,
            &mut rejected,
        )?;
    }

    primaries.extend(cross_references);
    Ok(FeedContents {
        records: primaries,
        rejected,
    })
}

fn handle_row(
    path: &Path,
    row: Result<Result<Vec<FeedRecord>, RecordParseError>, csv::Error>,
    primaries: &mut Vec<FeedRecord>,
    cross_references: &mut Vec<FeedRecord>,
    rejected: &mut Vec<RecordParseError>,
) -> Result<(), FeedError> {
    match row {
        Ok(Ok(records)) => {
            for record in records {
                match record {
                    FeedRecord::Primary { .. } => primaries.push(record),
                    FeedRecord::CrossReference { .. } => cross_references.push(record),
                }
            }
        }
        Ok(Err(error)) => rejected.push(error),
        Err(error) if error.is_io_error() => {
            return Err(FeedError::Read {
                path: path.to_path_buf(),
                source: error,
            });
        }
        Err(error) => rejected.push(RecordParseError {
            line: error.position().map_or(0, |p| p.line()),
            kind: RecordParseErrorKind::Malformed(error.to_string()),
        }),
    }
    Ok(())
}

fn parse_row(
    format: FeedFormat,
    row: &StringRecord,
    headers: Option<&StringRecord>,
    context: &FeedContext,
) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    match format {
        FeedFormat::Records => generic::parse_primary(row, headers),
        FeedFormat::CrossReferences => generic::parse_cross_reference(row, headers),
        FeedFormat::MetanetxChemProp => metanetx::parse_chem_prop(row),
        FeedFormat::MetanetxChemXref => metanetx::parse_chem_xref(row),
        FeedFormat::MetanetxChemDepr => metanetx::parse_chem_depr(row, context.release.as_deref()),
        FeedFormat::MetanetxReacProp => metanetx::parse_reac_prop(row),
        FeedFormat::MetanetxReacXref => metanetx::parse_reac_xref(row),
        FeedFormat::BiggMetabolites => bigg::parse_metabolite(row),
        FeedFormat::BiggReactions => bigg::parse_reaction(row),
        FeedFormat::SeedCompounds => seed::parse_compound(row),
        FeedFormat::SeedCompoundAliases => seed::parse_compound_alias(row),
        FeedFormat::SeedReactions => seed::parse_reaction(row),
        FeedFormat::SeedReactionAliases => seed::parse_reaction_alias(row),
        FeedFormat::SeedReactionPathways => seed::parse_reaction_pathway(row),
        FeedFormat::ChebiNames => chebi::parse_name(row),
        FeedFormat::ChebiStructures => chebi::parse_structure(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn feed_format_round_trips_through_its_name() {
        for format in FeedFormat::ALL {
            assert_eq!(format.as_str().parse::<FeedFormat>(), Ok(format));
        }
        assert_eq!("seed_compounds".parse::<FeedFormat>(), Ok(FeedFormat::SeedCompounds));
        assert!("kegg-pickle".parse::<FeedFormat>().is_err());
    }

    #[test]
    fn read_feed_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_feed(&dir.path().join("absent.tsv"), FeedFormat::SeedCompounds);
        assert!(matches!(result, Err(FeedError::Open { .. })));
    }

    #[test]
    fn read_feed_returns_primaries_before_cross_references() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chem_xref.tsv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "#source\tID\tdescription").unwrap();
        writeln!(file, "kegg.compound:C00031\tMNXM41\tD-glucose").unwrap();
        writeln!(file, "MNXM41\tMNXM41\tD-glucose").unwrap();
        writeln!(file, "bigg.metabolite:glc__D\tMNXM41\tD-Glucose").unwrap();

        let contents = read_feed(&path, FeedFormat::MetanetxChemXref).unwrap();
        let kinds: Vec<bool> = contents
            .records
            .iter()
            .map(|r| matches!(r, FeedRecord::Primary { .. }))
            .collect();
        assert_eq!(kinds, vec![true, true, true, false, false]);
        assert!(contents.rejected.is_empty());
    }

    #[test]
    fn read_feed_skips_and_reports_malformed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.tsv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "ModelSEED ID\tExternal ID\tSource").unwrap();
        writeln!(file, "cpd00027\tC00031\tKEGG").unwrap();
        writeln!(file, "cpd00001").unwrap();

        let contents = read_feed(&path, FeedFormat::SeedCompoundAliases).unwrap();
        assert_eq!(contents.records.len(), 1);
        assert_eq!(contents.rejected.len(), 1);
        assert!(matches!(
            contents.rejected[0].kind,
            RecordParseErrorKind::MissingColumn(_)
        ));
    }
}
