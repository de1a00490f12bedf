use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// External database an identifier was issued by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Kegg,
    Chebi,
    Metanetx,
    Bigg,
    Seed,
    Sabiork,
    Metacyc,
    Slm,
    Rhea,
    Reactome,
    Hmdb,
    Lipidmaps,
    Other(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Namespace must not be empty")]
pub struct ParseNamespaceError;

impl FromStr for Namespace {
    type Err = ParseNamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" => Err(ParseNamespaceError),
            "kegg" => Ok(Namespace::Kegg),
            "chebi" => Ok(Namespace::Chebi),
            "metanetx" | "mnx" => Ok(Namespace::Metanetx),
            "bigg" => Ok(Namespace::Bigg),
            "seed" | "modelseed" => Ok(Namespace::Seed),
            "sabiork" => Ok(Namespace::Sabiork),
            "metacyc" => Ok(Namespace::Metacyc),
            "slm" => Ok(Namespace::Slm),
            "rhea" => Ok(Namespace::Rhea),
            "reactome" => Ok(Namespace::Reactome),
            "hmdb" => Ok(Namespace::Hmdb),
            "lipidmaps" => Ok(Namespace::Lipidmaps),
            _ => Ok(Namespace::Other(normalized)),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Namespace::Kegg => "kegg",
            Namespace::Chebi => "chebi",
            Namespace::Metanetx => "metanetx",
            Namespace::Bigg => "bigg",
            Namespace::Seed => "seed",
            Namespace::Sabiork => "sabiork",
            Namespace::Metacyc => "metacyc",
            Namespace::Slm => "slm",
            Namespace::Rhea => "rhea",
            Namespace::Reactome => "reactome",
            Namespace::Hmdb => "hmdb",
            Namespace::Lipidmaps => "lipidmaps",
            Namespace::Other(name) => name,
        };
        write!(f, "{}", s)
    }
}

impl Serialize for Namespace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The two identifier spaces resolved independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Metabolite,
    Reaction,
}

impl EntityKind {
    /// Database ranking used when two canonical ids claim the same bare code.
    /// Earlier entries win.
    pub fn default_namespace_preference(self) -> Vec<Namespace> {
        match self {
            EntityKind::Metabolite => vec![
                Namespace::Kegg,
                Namespace::Chebi,
                Namespace::Metanetx,
                Namespace::Bigg,
                Namespace::Seed,
                Namespace::Sabiork,
            ],
            EntityKind::Reaction => vec![
                Namespace::Metanetx,
                Namespace::Seed,
                Namespace::Bigg,
                Namespace::Kegg,
                Namespace::Sabiork,
                Namespace::Metacyc,
            ],
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            EntityKind::Metabolite => "metabolites",
            EntityKind::Reaction => "reactions",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown entity kind: '{0}'")]
pub struct ParseEntityKindError(String);

impl FromStr for EntityKind {
    type Err = ParseEntityKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metabolite" | "metabolites" => Ok(EntityKind::Metabolite),
            "reaction" | "reactions" => Ok(EntityKind::Reaction),
            _ => Err(ParseEntityKindError(s.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Metabolite => write!(f, "metabolite"),
            EntityKind::Reaction => write!(f, "reaction"),
        }
    }
}

/// An identifier as issued by an external database, `<namespace>:<local-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawId {
    namespace: Namespace,
    local: String,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseRawIdError {
    #[error("Raw identifier '{0}' is missing the '<namespace>:' prefix")]
    MissingNamespace(String),
    #[error("Raw identifier '{0}' has an empty local part")]
    EmptyLocal(String),
}

impl RawId {
    pub fn new(namespace: Namespace, local: &str) -> Self {
        Self {
            namespace,
            local: local.trim().to_string(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The identifier with its namespace stripped.
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl FromStr for RawId {
    type Err = ParseRawIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (namespace, local) = s
            .split_once(':')
            .ok_or_else(|| ParseRawIdError::MissingNamespace(s.to_string()))?;
        let namespace = namespace
            .parse()
            .map_err(|_| ParseRawIdError::MissingNamespace(s.to_string()))?;
        if local.trim().is_empty() {
            return Err(ParseRawIdError::EmptyLocal(s.to_string()));
        }
        Ok(RawId::new(namespace, local))
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.local)
    }
}

impl Serialize for RawId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RawId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
