use crate::cli::MergeArgs;
use crate::config::build_merge_config;
use crate::data::DataManager;
use crate::error::Result;
use crate::utils::parser::validate_output_path;
use crate::utils::progress::CliProgressHandler;
use metmerge::engine::config::ObjectiveMode;
use metmerge::engine::error::EngineError;
use metmerge::engine::merge::{MergeResult, SimilarityMatrix};
use metmerge::engine::progress::ProgressReporter;
use metmerge::workflows::merge::{self, LoadedModels, MergeReport};
use metmerge::workflows::tables::IdentifierTables;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn run(
    args: MergeArgs,
    data_manager: &DataManager,
    progress: &CliProgressHandler,
) -> Result<()> {
    validate_output_path(&args.output)?;
    let mut app_config = build_merge_config(&args, data_manager)?;

    info!("Loading identifier tables from {:?}", &app_config.tables_dir);
    let tables = IdentifierTables::load(&app_config.tables_dir)?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let loaded = reporter.phase("Loading models", || {
        merge::load_models(&args.models, &reporter)
    });
    report_load_failures(&loaded);

    app_config.core_config.objective =
        remap_objective(app_config.core_config.objective, &args.models, &loaded)?;

    println!("Merging {} model(s)...", loaded.models.len());
    let result = merge::merge(&loaded.models, &tables, &app_config.core_config, &reporter)?;

    info!("Writing merged model to {:?}", &args.output);
    merge::write_model(&result.model, &args.output)?;
    print_summary(&result, &loaded);
    println!("✓ Merged model written to: {}", args.output.display());

    if args.stats {
        let report_path = report_path(&args.output);
        merge::write_report(&MergeReport::new(&result, &loaded.models), &report_path)?;
        println!("✓ Merge report written to: {}", report_path.display());
    }

    if !loaded.failures.is_empty() {
        println!("Warning: {} model(s) were skipped:", loaded.failures.len());
        for failure in &loaded.failures {
            println!("  {}", failure);
        }
    }
    Ok(())
}

/// Objective positions count every model given on the command line, including
/// ones that failed to load.
fn remap_objective(
    mode: ObjectiveMode,
    requested: &[PathBuf],
    loaded: &LoadedModels,
) -> Result<ObjectiveMode> {
    let ObjectiveMode::SelectOne(position) = mode else {
        return Ok(mode);
    };
    let invalid = || EngineError::InvalidObjectiveSelection {
        index: position,
        models: requested.len(),
    };
    if position >= requested.len() {
        return Err(invalid().into());
    }
    let index = loaded.index_of_requested(position).ok_or_else(invalid)?;
    Ok(ObjectiveMode::SelectOne(index))
}

fn report_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "merged".to_string());
    output.with_file_name(format!("{}-report.json", stem))
}

fn report_load_failures(loaded: &LoadedModels) {
    for failure in &loaded.failures {
        warn!("{}", failure);
    }
}

fn print_summary(result: &MergeResult, loaded: &LoadedModels) {
    let model = &result.model;
    println!(
        "  {}: {} metabolites ({} merged), {} reactions ({} merged), {} genes",
        model.id(),
        model.metabolite_count(),
        result.metabolites_merged,
        model.reaction_count(),
        result.reactions_merged,
        model.gene_count()
    );
    let names: Vec<&str> = loaded.models.iter().map(|m| m.id()).collect();
    print_similarity(&result.similarity, &names);
}

/// Metabolite distances above the diagonal, reaction distances below.
fn print_similarity(matrix: &SimilarityMatrix, names: &[&str]) {
    if matrix.size() < 2 {
        return;
    }
    println!("  Jaccard distances (metabolites above, reactions below the diagonal):");
    let width = names.iter().map(|name| name.len()).max().unwrap_or(0).max(6);
    print!("  {:width$}", "", width = width);
    for name in names {
        print!(" {:>width$}", name, width = width);
    }
    println!();
    for (name, row) in names.iter().zip(matrix.rows()) {
        print!("  {:width$}", name, width = width);
        for value in row {
            print!(" {:>width$.3}", value, width = width);
        }
        println!();
    }
}
