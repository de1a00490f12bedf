use super::{FeedRecord, RecordParseErrorKind, column, split_list};
use crate::core::identifiers::namespace::{Namespace, RawId};
use crate::core::identifiers::properties::{PropertyBag, PropertyField};
use csv::StringRecord;

const NULL: &str = "null";
// ModelSEED's placeholder for compounds without a defined mass.
const UNDEFINED_MASS: f64 = 10_000_000.0;

const ALIAS_DATABASES: [&str; 5] = ["seed", "metanetx", "bigg", "kegg", "chebi"];

fn seed(local: &str) -> RawId {
    RawId::new(Namespace::Seed, local)
}

fn seed_list(cell: &str) -> impl Iterator<Item = RawId> + '_ {
    split_list(cell, ";").filter(|id| *id != NULL).map(seed)
}

fn defined_mass(value: &str) -> Result<Option<&str>, RecordParseErrorKind> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case(NULL) {
        return Ok(None);
    }
    let mass: f64 = value.parse().map_err(|_| RecordParseErrorKind::InvalidValue {
        field: "mass",
        value: value.to_string(),
    })?;
    Ok((mass != UNDEFINED_MASS).then_some(value))
}

/// `compounds.tsv`: id, abbreviation, name, formula, mass, source, inchikey,
/// charge, is_core, is_obsolete, linked_compound, ...
pub(super) fn parse_compound(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let source = seed(column(row, 0)?);
    let mut properties = PropertyBag::new()
        .with(PropertyField::Names, [column(row, 2)?])
        .with(PropertyField::Formula, [column(row, 3)?])
        .with(PropertyField::Inchikey, [column(row, 6)?]);
    if let Some(mass) = defined_mass(column(row, 4)?)? {
        properties.add(PropertyField::Mass, [mass]);
    }

    let mut records = vec![FeedRecord::primary(vec![source.clone()], properties)];
    let linked: Vec<RawId> = seed_list(row.get(10).unwrap_or_default()).collect();
    if !linked.is_empty() {
        records.push(FeedRecord::cross_reference(source, linked));
    }
    Ok(records)
}

/// `Unique_ModelSEED_Compound_Aliases.txt`: ModelSEED id, external id, source.
pub(super) fn parse_compound_alias(
    row: &StringRecord,
) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let external_id = column(row, 1)?;
    let database = column(row, 2)?.to_lowercase();
    let source = seed(&column(row, 0)?.to_lowercase());

    let namespace = if database == "metanetx.chemical" {
        Namespace::Metanetx
    } else if ALIAS_DATABASES.contains(&database.as_str()) {
        database
            .parse()
            .map_err(|_| RecordParseErrorKind::InvalidIdentifier(database.clone()))?
    } else {
        return Ok(Vec::new());
    };
    Ok(vec![FeedRecord::cross_reference(
        source,
        vec![RawId::new(namespace, external_id)],
    )])
}

/// `reactions.tsv`: the id is column 0, the name column 2, EC numbers column 13
/// and linked reactions column 19.
pub(super) fn parse_reaction(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let mut ids = vec![seed(column(row, 0)?)];
    ids.extend(seed_list(column(row, 19)?));
    let properties = PropertyBag::new()
        .with(PropertyField::Names, [column(row, 2)?])
        .with(PropertyField::EcNumbers, [column(row, 13)?]);
    Ok(vec![FeedRecord::primary(ids, properties)])
}

/// `Unique_ModelSEED_Reaction_Aliases.txt`: ModelSEED id, external id, source.
///
/// BiGG aliases and model-specific sources (`iAF1260`, ...) are ignored.
pub(super) fn parse_reaction_alias(
    row: &StringRecord,
) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let id = seed(column(row, 0)?);
    let external_id = column(row, 1)?;
    let database = column(row, 2)?.to_lowercase();

    let namespace = match database.as_str() {
        "metanetx.reaction" => Namespace::Metanetx,
        "bigg" | "bigg1" => return Ok(Vec::new()),
        db if db.starts_with('i') => return Ok(Vec::new()),
        db => db
            .parse()
            .map_err(|_| RecordParseErrorKind::InvalidIdentifier(db.to_string()))?,
    };
    Ok(vec![FeedRecord::primary(
        vec![id, RawId::new(namespace, external_id)],
        PropertyBag::new(),
    )])
}

/// `Unique_ModelSEED_Reaction_Pathways.txt`: ModelSEED id, pathway.
pub(super) fn parse_reaction_pathway(
    row: &StringRecord,
) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let id = seed(column(row, 0)?);
    let properties = PropertyBag::new().with(PropertyField::Pathways, [column(row, 1)?]);
    Ok(vec![FeedRecord::primary(vec![id], properties)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound_row(mass: &str, linked: &str) -> StringRecord {
        StringRecord::from(vec![
            "cpd00027",
            "glc-D",
            "D-Glucose",
            "C6H12O6",
            mass,
            "Primary Database",
            "WQZGKKKJIJFFOK-GASJEMHNSA-N",
            "0",
            "1",
            "0",
            linked,
        ])
    }

    #[test]
    fn parse_compound_reads_properties_and_linked_compounds() {
        let records = parse_compound(&compound_row("180.0", "cpd19001;cpd26821")).unwrap();
        assert_eq!(records.len(), 2);
        let FeedRecord::Primary { properties, .. } = &records[0] else {
            panic!("expected a primary record");
        };
        assert_eq!(properties.mass(), &["180.0".to_string()]);
        assert_eq!(properties.formula(), &["C6H12O6".to_string()]);
    }

    #[test]
    fn parse_compound_ignores_placeholder_mass_and_null_links() {
        let records = parse_compound(&compound_row("10000000", "null")).unwrap();
        assert_eq!(records.len(), 1);
        let FeedRecord::Primary { properties, .. } = &records[0] else {
            panic!("expected a primary record");
        };
        assert!(properties.mass().is_empty());
    }

    #[test]
    fn parse_compound_rejects_unparseable_mass() {
        let result = parse_compound(&compound_row("heavy", "null"));
        assert!(matches!(result, Err(RecordParseErrorKind::InvalidValue { field: "mass", .. })));
    }

    #[test]
    fn parse_compound_alias_keeps_trusted_sources_only() {
        let row = StringRecord::from(vec!["cpd00027", "MNXM41", "metanetx.chemical"]);
        let records = parse_compound_alias(&row).unwrap();
        assert_eq!(
            records,
            vec![FeedRecord::cross_reference(
                seed("cpd00027"),
                vec!["metanetx:MNXM41".parse().unwrap()],
            )]
        );

        let row = StringRecord::from(vec!["cpd00027", "Glucose", "name"]);
        assert!(parse_compound_alias(&row).unwrap().is_empty());
    }

    #[test]
    fn parse_reaction_alias_skips_model_sources() {
        let row = StringRecord::from(vec!["rxn00558", "PGI", "iAF1260"]);
        assert!(parse_reaction_alias(&row).unwrap().is_empty());

        let row = StringRecord::from(vec!["rxn00558", "R02740", "KEGG"]);
        let records = parse_reaction_alias(&row).unwrap();
        let FeedRecord::Primary { ids, .. } = &records[0] else {
            panic!("expected a primary record");
        };
        assert_eq!(ids[1].to_string(), "kegg:R02740");
    }
}
