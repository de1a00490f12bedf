use super::{FeedRecord, RecordParseErrorKind, parse_raw_id, split_list};
use crate::core::identifiers::properties::{PropertyBag, PropertyField};
use csv::StringRecord;
use serde::Deserialize;

const LIST_SEPARATOR: &str = ";";

/// A row of the neutral primary-record layout. List cells are `;`-separated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrimaryRecordRow {
    pub id: String,
    #[serde(default)]
    pub co_ids: String,
    #[serde(default)]
    pub names: String,
    #[serde(default)]
    pub formula: String,
    #[serde(default)]
    pub mass: String,
    #[serde(default)]
    pub inchikey: String,
    #[serde(default)]
    pub ec_numbers: String,
    #[serde(default)]
    pub pathways: String,
    #[serde(default)]
    pub xref_links: String,
}

impl PrimaryRecordRow {
    pub fn into_record(self) -> Result<FeedRecord, RecordParseErrorKind> {
        let mut ids = vec![parse_raw_id(&self.id)?];
        for co_id in split_list(&self.co_ids, LIST_SEPARATOR) {
            ids.push(parse_raw_id(co_id)?);
        }
        let properties = PropertyBag::new()
            .with(PropertyField::Names, split_list(&self.names, LIST_SEPARATOR))
            .with(PropertyField::Formula, split_list(&self.formula, LIST_SEPARATOR))
            .with(PropertyField::Mass, split_list(&self.mass, LIST_SEPARATOR))
            .with(PropertyField::Inchikey, split_list(&self.inchikey, LIST_SEPARATOR))
            .with(PropertyField::EcNumbers, split_list(&self.ec_numbers, LIST_SEPARATOR))
            .with(PropertyField::Pathways, split_list(&self.pathways, LIST_SEPARATOR))
            .with(PropertyField::XrefLinks, split_list(&self.xref_links, LIST_SEPARATOR));
        Ok(FeedRecord::primary(ids, properties))
    }
}

/// A row of the neutral cross-reference layout.
#[derive(Debug, Clone, Deserialize)]
pub struct CrossReferenceRow {
    pub source: String,
    pub other: String,
}

impl CrossReferenceRow {
    pub fn into_record(self) -> Result<FeedRecord, RecordParseErrorKind> {
        let source = parse_raw_id(&self.source)?;
        let others = split_list(&self.other, LIST_SEPARATOR)
            .map(parse_raw_id)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FeedRecord::cross_reference(source, others))
    }
}

pub(super) fn parse_primary(
    row: &StringRecord,
    headers: Option<&StringRecord>,
) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let parsed: PrimaryRecordRow = row
        .deserialize(headers)
        .map_err(|e| RecordParseErrorKind::Malformed(e.to_string()))?;
    Ok(vec![parsed.into_record()?])
}

pub(super) fn parse_cross_reference(
    row: &StringRecord,
    headers: Option<&StringRecord>,
) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let parsed: CrossReferenceRow = row
        .deserialize(headers)
        .map_err(|e| RecordParseErrorKind::Malformed(e.to_string()))?;
    Ok(vec![parsed.into_record()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> StringRecord {
        StringRecord::from(vec!["id", "co-ids", "names", "formula", "mass", "inchikey"])
    }

    #[test]
    fn parse_primary_reads_named_columns_and_lists() {
        let row = StringRecord::from(vec![
            "kegg:C00031",
            "chebi:4167;chebi:17634",
            "D-Glucose;Grape sugar",
            "C6H12O6",
            "180.16",
            "-",
        ]);
        let records = parse_primary(&row, Some(&headers())).unwrap();
        let FeedRecord::Primary { ids, properties } = &records[0] else {
            panic!("expected a primary record");
        };
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0].to_string(), "kegg:C00031");
        assert_eq!(properties.names().len(), 2);
        assert_eq!(properties.mass(), &["180.16".to_string()]);
        assert!(properties.inchikey().is_empty());
    }

    #[test]
    fn parse_primary_rejects_ids_without_namespace() {
        let row = StringRecord::from(vec!["C00031", "", "", "", "", ""]);
        let result = parse_primary(&row, Some(&headers()));
        assert_eq!(
            result,
            Err(RecordParseErrorKind::InvalidIdentifier("C00031".to_string()))
        );
    }

    #[test]
    fn parse_cross_reference_splits_other_column() {
        let headers = StringRecord::from(vec!["source", "other"]);
        let row = StringRecord::from(vec!["bigg:glc__D", "kegg:C00031;seed:cpd00027"]);
        let records = parse_cross_reference(&row, Some(&headers)).unwrap();
        assert!(matches!(
            &records[0],
            FeedRecord::CrossReference { others, .. } if others.len() == 2
        ));
    }
}
