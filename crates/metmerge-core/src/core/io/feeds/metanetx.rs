use super::{FeedRecord, RecordParseErrorKind, column};
use crate::core::identifiers::namespace::{Namespace, RawId};
use crate::core::identifiers::properties::{PropertyBag, PropertyField};
use csv::StringRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const EMPTY_COMPOUND: &str = "MNXM0";
const EMPTY_REACTION: &str = "EMPTY";

// Cross references already covered by a dedicated namespace prefix in the same file.
const REDUNDANT_CHEMICAL_SOURCES: [&str; 16] = [
    "keggC", "envipathM", "envipath", "seedM", "CHEBI", "biggM", "keggD", "SLM", "keggE", "keggG",
    "reactomeM", "sabiorkM", "rheaP", "rheaG", "lipidmapsM", "metacycM",
];

const UNINFORMATIVE_DESCRIPTIONS: [&str; 4] =
    ["unknown", "no description", "obsolete", "molecular entity"];

fn metanetx(local: &str) -> RawId {
    RawId::new(Namespace::Metanetx, local)
}

fn is_metanetx_entry(id: &str) -> bool {
    id.starts_with('M')
}

fn is_metanetx_reference(source: &str) -> bool {
    source.starts_with("MNX") || source.starts_with("mnx")
}

/// Reads the release tag from a `#VERSION` comment line.
pub(super) fn release_version(path: &Path) -> io::Result<Option<String>> {
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        if !line.starts_with('#') {
            break;
        }
        if line.contains("VERSION") {
            return Ok(line.split_whitespace().last().map(str::to_string));
        }
    }
    Ok(None)
}

/// `chem_prop`: ID, name, reference, formula, charge, mass, InChI, InChIKey, SMILES.
pub(super) fn parse_chem_prop(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let id = column(row, 0)?;
    if !is_metanetx_entry(id) {
        return Ok(Vec::new());
    }
    let name = column(row, 1)?;
    let mut properties = PropertyBag::new().with(PropertyField::Names, [name]);

    if row.len() > 7 {
        properties.add(PropertyField::Formula, [column(row, 3)?]);
        properties.add(PropertyField::Mass, [column(row, 5)?]);
        let inchikey = column(row, 7)?;
        properties.add(
            PropertyField::Inchikey,
            [inchikey.split_once('=').map_or(inchikey, |(_, key)| key)],
        );
    }

    Ok(vec![FeedRecord::primary(vec![metanetx(id)], properties)])
}

/// `chem_xref`: source, ID, description.
///
/// Every non-obsolete row asserts the MetaNetX entry itself; informative rows
/// pointing at another database also yield a cross reference.
pub(super) fn parse_chem_xref(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let source = column(row, 0)?;
    let id = column(row, 1)?;
    let description = column(row, 2).unwrap_or_default();
    let description_lower = description.to_lowercase();

    let mut records = Vec::new();
    if !description_lower.contains("obsolete") {
        records.push(FeedRecord::primary(vec![metanetx(id)], PropertyBag::new()));
    }

    if is_metanetx_reference(source)
        || id == EMPTY_COMPOUND
        || UNINFORMATIVE_DESCRIPTIONS
            .iter()
            .any(|word| description_lower.contains(word))
    {
        return Ok(records);
    }
    let Some((database, local)) = source.split_once(':') else {
        return Ok(records);
    };

    let other = if let Some((database, _)) = database.split_once('.') {
        Some(RawId::new(parse_namespace(database)?, local))
    } else if !REDUNDANT_CHEMICAL_SOURCES.contains(&database) {
        Some(RawId::new(parse_namespace(database)?, local))
    } else {
        None
    };

    if let Some(other) = other {
        records.push(FeedRecord::cross_reference(metanetx(id), vec![other]));
    }
    Ok(records)
}

/// `chem_depr`: deprecated ID, current ID, release.
///
/// Only deprecations of the announced release are applied; a file without a
/// release tag applies all of them.
pub(super) fn parse_chem_depr(
    row: &StringRecord,
    release: Option<&str>,
) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let deprecated = column(row, 0)?;
    let current = column(row, 1)?;
    let row_release = column(row, 2).unwrap_or_default();
    if release.is_some_and(|release| release != row_release) {
        return Ok(Vec::new());
    }
    Ok(vec![FeedRecord::cross_reference(
        metanetx(current),
        vec![metanetx(deprecated)],
    )])
}

/// `reac_prop`: ID, equation, reference, EC numbers, balance, transport.
pub(super) fn parse_reac_prop(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let id = column(row, 0)?;
    if !is_metanetx_entry(id) {
        return Ok(Vec::new());
    }
    let reference = column(row, 2)?;
    let other = reaction_reference(reference)?;

    let mut properties = PropertyBag::new();
    if let Some(ec_numbers) = row.get(3) {
        properties.add(PropertyField::EcNumbers, ec_numbers.split(';'));
    }
    Ok(vec![FeedRecord::primary(vec![metanetx(id), other], properties)])
}

/// `reac_xref`: source, ID, description.
pub(super) fn parse_reac_xref(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let source = column(row, 0)?;
    let id = column(row, 1)?;
    if is_metanetx_reference(source) || id == EMPTY_REACTION {
        return Ok(Vec::new());
    }
    let (database, local) = source
        .split_once(':')
        .ok_or_else(|| RecordParseErrorKind::InvalidIdentifier(source.to_string()))?;
    let namespace = match database.split_once('.') {
        Some((database, _)) => parse_namespace(database)?,
        None => reaction_namespace(database)?,
    };
    Ok(vec![FeedRecord::primary(
        vec![metanetx(id), RawId::new(namespace, local)],
        PropertyBag::new(),
    )])
}

fn reaction_reference(reference: &str) -> Result<RawId, RecordParseErrorKind> {
    let (database, local) = reference
        .split_once(':')
        .ok_or_else(|| RecordParseErrorKind::InvalidIdentifier(reference.to_string()))?;
    Ok(RawId::new(reaction_namespace(database)?, local))
}

/// MetaNetX tags reaction sources with a trailing `R` (`keggR`, `biggR`).
fn reaction_namespace(database: &str) -> Result<Namespace, RecordParseErrorKind> {
    if database.eq_ignore_ascii_case("mnx") {
        return Ok(Namespace::Metanetx);
    }
    match database.strip_suffix('R') {
        Some(stripped) => parse_namespace(stripped),
        None => parse_namespace(database),
    }
}

fn parse_namespace(database: &str) -> Result<Namespace, RecordParseErrorKind> {
    database
        .parse()
        .map_err(|_| RecordParseErrorKind::InvalidIdentifier(database.to_string()))
}
