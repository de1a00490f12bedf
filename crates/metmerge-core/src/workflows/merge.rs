use super::tables::IdentifierTables;
use crate::core::identifiers::namespace::Namespace;
use crate::core::io::cobra_json::CobraJsonFile;
use crate::core::io::traits::ModelFile;
use crate::core::models::model::MetabolicModel;
use crate::engine::config::MergeConfig;
use crate::engine::error::EngineError;
use crate::engine::merge::{MergeEngine, MergeResult, Provenance, SimilarityMatrix};
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Models read by [`load_models`], in input order, plus the files that failed.
#[derive(Debug, Default)]
pub struct LoadedModels {
    pub models: Vec<MetabolicModel>,
    pub paths: Vec<PathBuf>,
    /// One [`EngineError::ModelLoad`] per unreadable file.
    pub failures: Vec<EngineError>,
    /// Positions of the unreadable files in the requested list.
    pub failed_positions: Vec<usize>,
}

impl LoadedModels {
    /// Index into `models` of the file requested at `position`, or `None`
    /// when that file failed to load or was never requested.
    pub fn index_of_requested(&self, position: usize) -> Option<usize> {
        if position >= self.models.len() + self.failed_positions.len()
            || self.failed_positions.contains(&position)
        {
            return None;
        }
        let skipped = self
            .failed_positions
            .iter()
            .filter(|&&failed| failed < position)
            .count();
        Some(position - skipped)
    }
}

/// Loads every model file, dropping the ones that cannot be read.
#[instrument(skip_all, name = "load_models")]
pub fn load_models<P: AsRef<Path>>(paths: &[P], reporter: &ProgressReporter) -> LoadedModels {
    let mut loaded = LoadedModels::default();
    reporter.report(Progress::TaskStart {
        total_steps: paths.len() as u64,
    });

    for (position, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        match CobraJsonFile::read_from_path(path) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    metabolites = model.metabolite_count(),
                    reactions = model.reaction_count(),
                    "Model loaded."
                );
                loaded.models.push(model);
                loaded.paths.push(path.to_path_buf());
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "Skipping unreadable model.");
                loaded.failures.push(EngineError::ModelLoad {
                    path: path.to_string_lossy().to_string(),
                    source,
                });
                loaded.failed_positions.push(position);
            }
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    loaded
}

/// Merges `models` within the identifier space of `tables`.
#[instrument(skip_all, name = "merge_workflow")]
pub fn merge(
    models: &[MetabolicModel],
    tables: &IdentifierTables,
    config: &MergeConfig,
    reporter: &ProgressReporter,
) -> Result<MergeResult, EngineError> {
    info!(
        models = models.len(),
        canonical_metabolites = tables.metabolites.len(),
        canonical_reactions = tables.reactions.len(),
        "Starting merge."
    );
    let engine = MergeEngine::new(tables.canonicalizer(), config);
    reporter.phase("Merging", || engine.merge(models))
}

/// Renames the metabolites and reactions of one model into `namespace`.
#[instrument(skip_all, name = "translate_workflow")]
pub fn translate(
    model: &MetabolicModel,
    tables: &IdentifierTables,
    namespace: Namespace,
    reporter: &ProgressReporter,
) -> Result<MetabolicModel, EngineError> {
    info!(model = model.id(), %namespace, "Translating model.");
    let config = MergeConfig {
        translate_to: Some(namespace),
        ..MergeConfig::default()
    };
    let engine = MergeEngine::new(tables.canonicalizer(), &config);
    let result = reporter.phase("Translating", || engine.merge(std::slice::from_ref(model)))?;
    Ok(result.model)
}

pub fn write_model(model: &MetabolicModel, path: &Path) -> Result<(), EngineError> {
    CobraJsonFile::write_to_path(model, path).map_err(|source| EngineError::ModelWrite {
        path: path.to_string_lossy().to_string(),
        source,
    })
}

/// Statistics of a merge, in the shape written by [`write_report`].
#[derive(Debug, Serialize)]
pub struct MergeReport<'a> {
    pub merged_model: &'a str,
    pub inputs: Vec<String>,
    pub metabolites_merged: usize,
    pub reactions_merged: usize,
    pub similarity: &'a SimilarityMatrix,
    pub metabolite_sources: &'a Provenance,
    pub reaction_sources: &'a Provenance,
}

impl<'a> MergeReport<'a> {
    pub fn new(result: &'a MergeResult, inputs: &[MetabolicModel]) -> Self {
        Self {
            merged_model: result.model.id(),
            inputs: inputs.iter().map(|m| m.id().to_string()).collect(),
            metabolites_merged: result.metabolites_merged,
            reactions_merged: result.reactions_merged,
            similarity: &result.similarity,
            metabolite_sources: &result.metabolite_sources,
            reaction_sources: &result.reaction_sources,
        }
    }
}

pub fn write_report(report: &MergeReport<'_>, path: &Path) -> Result<(), EngineError> {
    let report_err = |source| EngineError::ReportWrite {
        path: path.to_string_lossy().to_string(),
        source,
    };
    let json = serde_json::to_string_pretty(report)
        .map_err(std::io::Error::from)
        .map_err(report_err)?;
    std::fs::write(path, json).map_err(report_err)
}
