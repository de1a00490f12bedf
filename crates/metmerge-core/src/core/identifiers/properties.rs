use super::namespace::{Namespace, RawId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tokens that database dumps use to mean "no value".
const RESERVED_EMPTY_TOKENS: [&str; 5] = ["", "''", "\"\"", "null", "-"];

pub fn is_reserved_empty(value: &str) -> bool {
    RESERVED_EMPTY_TOKENS.contains(&value.trim())
}

/// The named, list-valued properties a record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyField {
    Names,
    Formula,
    Mass,
    Inchikey,
    EcNumbers,
    Pathways,
    XrefLinks,
}

/// Aggregated knowledge about one canonical compound or reaction.
///
/// Every list is de-duplicated on insert: names case-insensitively, all other
/// fields exactly. Reserved empty tokens never enter the bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    #[serde(default)]
    ids: BTreeSet<RawId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    formula: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    mass: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    inchikey: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ec_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pathways: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    xref_links: Vec<String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, field: PropertyField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add(field, values);
        self
    }

    pub fn ids(&self) -> &BTreeSet<RawId> {
        &self.ids
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn formula(&self) -> &[String] {
        &self.formula
    }

    pub fn mass(&self) -> &[String] {
        &self.mass
    }

    pub fn inchikey(&self) -> &[String] {
        &self.inchikey
    }

    pub fn ec_numbers(&self) -> &[String] {
        &self.ec_numbers
    }

    pub fn pathways(&self) -> &[String] {
        &self.pathways
    }

    pub fn xref_links(&self) -> &[String] {
        &self.xref_links
    }

    pub fn field(&self, field: PropertyField) -> &[String] {
        match field {
            PropertyField::Names => &self.names,
            PropertyField::Formula => &self.formula,
            PropertyField::Mass => &self.mass,
            PropertyField::Inchikey => &self.inchikey,
            PropertyField::EcNumbers => &self.ec_numbers,
            PropertyField::Pathways => &self.pathways,
            PropertyField::XrefLinks => &self.xref_links,
        }
    }

    fn field_mut(&mut self, field: PropertyField) -> &mut Vec<String> {
        match field {
            PropertyField::Names => &mut self.names,
            PropertyField::Formula => &mut self.formula,
            PropertyField::Mass => &mut self.mass,
            PropertyField::Inchikey => &mut self.inchikey,
            PropertyField::EcNumbers => &mut self.ec_numbers,
            PropertyField::Pathways => &mut self.pathways,
            PropertyField::XrefLinks => &mut self.xref_links,
        }
    }

    pub fn add<I, S>(&mut self, field: PropertyField, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let case_insensitive = field == PropertyField::Names;
        let list = self.field_mut(field);
        for value in values {
            let value = value.as_ref().trim();
            if is_reserved_empty(value) {
                continue;
            }
            let present = if case_insensitive {
                list.iter().any(|existing| existing.eq_ignore_ascii_case(value))
            } else {
                list.iter().any(|existing| existing == value)
            };
            if !present {
                list.push(value.to_string());
            }
        }
    }

    pub fn insert_id(&mut self, id: RawId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove_id(&mut self, id: &RawId) -> bool {
        self.ids.remove(id)
    }

    pub fn contains_namespace(&self, namespace: &Namespace) -> bool {
        self.ids.iter().any(|id| id.namespace() == namespace)
    }

    /// First identifier of this bag issued by `namespace`, in sorted order.
    pub fn id_in_namespace(&self, namespace: &Namespace) -> Option<&RawId> {
        self.ids.iter().find(|id| id.namespace() == namespace)
    }

    /// Unions every identifier and property of `other` into this bag.
    pub fn absorb(&mut self, other: &PropertyBag) {
        self.ids.extend(other.ids.iter().cloned());
        self.absorb_properties(other);
    }

    /// Unions the property lists of `other`, leaving identifiers untouched.
    pub fn absorb_properties(&mut self, other: &PropertyBag) {
        for field in [
            PropertyField::Names,
            PropertyField::Formula,
            PropertyField::Mass,
            PropertyField::Inchikey,
            PropertyField::EcNumbers,
            PropertyField::Pathways,
            PropertyField::XrefLinks,
        ] {
            let values = other.field(field).to_vec();
            self.add(field, values);
        }
    }
}
