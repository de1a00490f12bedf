use super::{FeedRecord, RecordParseErrorKind, column, parse_raw_id};
use crate::core::identifiers::namespace::{Namespace, RawId};
use crate::core::identifiers::properties::{PropertyBag, PropertyField};
use csv::StringRecord;

/// `compounds.tsv`: id, status, chebi_accession, source, parent_id, name, ...
pub(super) fn parse_name(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let name = column(row, 5)?;
    if name == "null" {
        return Ok(Vec::new());
    }
    let accession = column(row, 2)?.to_lowercase();
    let id = if accession.starts_with("chebi:") {
        parse_raw_id(&accession)?
    } else {
        RawId::new(Namespace::Chebi, &accession)
    };
    let properties = PropertyBag::new().with(PropertyField::Names, [name]);
    Ok(vec![FeedRecord::primary(vec![id], properties)])
}

/// `structures.csv`: id, compound_id, structure, type, dimension, ...
///
/// Only rows whose structure type is `InChIKey` are used.
pub(super) fn parse_structure(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    if !row.iter().any(|field| field.trim().eq_ignore_ascii_case("inchikey")) {
        return Ok(Vec::new());
    }
    let id = RawId::new(Namespace::Chebi, column(row, 1)?);
    let properties = PropertyBag::new().with(PropertyField::Inchikey, [column(row, 2)?]);
    Ok(vec![FeedRecord::primary(vec![id], properties)])
}
