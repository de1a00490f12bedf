use thiserror::Error;

use super::config::ConfigError;
use crate::core::identifiers::table::TableError;
use crate::core::io::cobra_json::CobraJsonError;
use crate::core::io::feeds::{FeedError, ManifestError};
use crate::core::models::ids::CanonicalId;
use crate::core::models::model::ModelError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Feed manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Identifier table error: {0}")]
    Table(#[from] TableError),

    #[error("Failed to load model '{path}': {source}")]
    ModelLoad {
        path: String,
        source: CobraJsonError,
    },

    #[error("Failed to write model '{path}': {source}")]
    ModelWrite {
        path: String,
        source: CobraJsonError,
    },

    #[error("Failed to write merge report '{path}': {source}")]
    ReportWrite {
        path: String,
        source: std::io::Error,
    },

    #[error("At least one model is required")]
    NoModels,

    #[error("Objective of model {index} requested, but only {models} models were given")]
    InvalidObjectiveSelection { index: usize, models: usize },

    #[error("Canonical id {0} has no entry in the identifier table")]
    UnknownCanonical(CanonicalId),

    #[error("Inconsistent merged model: {0}")]
    Model(#[from] ModelError),
}
