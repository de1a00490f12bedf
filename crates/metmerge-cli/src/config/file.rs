use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileKindPolicy {
    pub require_corroboration: Option<bool>,
    pub namespace_preference: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileResolutionConfig {
    pub min_agreeing_properties: Option<usize>,
    pub mass_tolerance: Option<f64>,
    pub skip_same_namespace_links: Option<bool>,
    pub metabolites: Option<FileKindPolicy>,
    pub reactions: Option<FileKindPolicy>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileMergeConfig {
    /// `merge`, or the 1-based position of the model whose objective is kept.
    pub objective: Option<String>,
    pub exact_stoichiometry: Option<bool>,
    pub include_protonation: Option<bool>,
    pub extend_annotations: Option<bool>,
    pub translate_to: Option<String>,
    pub proton_identifier: Option<String>,
    pub boundary_suffix: Option<String>,
    pub proton_motive_force_name: Option<String>,
    pub filler: Option<char>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub tables_dir: Option<PathBuf>,
    pub resolution: Option<FileResolutionConfig>,
    pub merge: Option<FileMergeConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }
}
