use super::{FeedRecord, RecordParseErrorKind, column, parse_raw_id, split_list};
use crate::core::identifiers::namespace::{Namespace, RawId};
use crate::core::identifiers::properties::{PropertyBag, PropertyField};
use csv::StringRecord;

const LINK_SEPARATOR: &str = "; ";

// Only identifiers from these databases are trusted as BiGG cross references.
const TRUSTED_DATABASES: [&str; 5] = ["seed", "metanetx", "bigg", "kegg", "chebi"];

/// An `identifiers.org` style link, `http://identifiers.org/<db>/<id>`.
struct DatabaseLink<'a> {
    url: &'a str,
    database: &'a str,
    id: &'a str,
}

fn database_links(cell: &str) -> impl Iterator<Item = DatabaseLink<'_>> {
    cell.split(LINK_SEPARATOR).filter_map(|link| {
        let url = &link[link.find("http")?..];
        let mut parts = url.split('/');
        let database = parts.nth(3)?;
        let id = parts.next()?;
        Some(DatabaseLink { url, database, id })
    })
}

/// `bigg_models_metabolites.txt`: bigg_id, universal_bigg_id, name,
/// model_list, database_links, old_bigg_ids.
pub(super) fn parse_metabolite(
    row: &StringRecord,
) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let universal_id = column(row, 1)?;
    if universal_id.to_lowercase().contains("recon") {
        return Ok(Vec::new());
    }
    let source = RawId::new(Namespace::Bigg, universal_id);

    let mut properties = PropertyBag::new();
    if let Some(name) = row.get(2) {
        properties.add(PropertyField::Names, [name]);
    }

    let mut others = Vec::new();
    for link in database_links(row.get(4).unwrap_or_default()) {
        let database = link.database.to_lowercase();
        if database == "inchikey" {
            properties.add(PropertyField::Inchikey, [link.id]);
            continue;
        }
        if ["kegg", "metanetx", "seed"]
            .iter()
            .any(|db| link.url.contains(db))
        {
            properties.add(PropertyField::XrefLinks, [link.url]);
        }
        if database == "chebi" {
            others.push(parse_raw_id(&link.id.to_lowercase())?);
            continue;
        }
        let name = database.split('.').next().unwrap_or_default();
        if TRUSTED_DATABASES.contains(&name) {
            others.push(RawId::new(
                name.parse()
                    .map_err(|_| RecordParseErrorKind::InvalidIdentifier(name.to_string()))?,
                link.id,
            ));
        }
    }

    let mut records = vec![FeedRecord::primary(vec![source.clone()], properties)];
    if !others.is_empty() {
        records.push(FeedRecord::cross_reference(source, others));
    }
    Ok(records)
}

/// `bigg_models_reactions.txt`: bigg_id, name, reaction_string, model_list,
/// database_links, old_bigg_ids.
pub(super) fn parse_reaction(row: &StringRecord) -> Result<Vec<FeedRecord>, RecordParseErrorKind> {
    let mut ids = vec![RawId::new(Namespace::Bigg, column(row, 0)?)];
    ids.extend(
        split_list(row.get(5).unwrap_or_default(), ";").map(|old| RawId::new(Namespace::Bigg, old)),
    );

    let mut properties = PropertyBag::new().with(PropertyField::Names, [column(row, 1)?]);
    for link in database_links(row.get(4).unwrap_or_default()) {
        if link.database.eq_ignore_ascii_case("ec-code") {
            properties.add(PropertyField::EcNumbers, [link.id]);
        } else {
            match link.database.split('.').next().map(str::to_lowercase).as_deref() {
                Some("seed") => ids.push(RawId::new(Namespace::Seed, link.id)),
                Some("metanetx") => ids.push(RawId::new(Namespace::Metanetx, link.id)),
                _ => {}
            }
        }
        let url = link.url.to_lowercase();
        if ["seed", "kegg", "metanetx"].iter().any(|db| url.contains(db)) {
            properties.add(PropertyField::XrefLinks, [link.url]);
        }
    }

    Ok(vec![FeedRecord::primary(ids, properties)])
}
