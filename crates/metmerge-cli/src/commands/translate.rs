use crate::cli::TranslateArgs;
use crate::config::tables_dir;
use crate::data::DataManager;
use crate::error::Result;
use crate::utils::parser::validate_output_path;
use crate::utils::progress::CliProgressHandler;
use metmerge::core::io::cobra_json::CobraJsonFile;
use metmerge::core::io::traits::ModelFile;
use metmerge::engine::error::EngineError;
use metmerge::engine::progress::ProgressReporter;
use metmerge::workflows::merge;
use metmerge::workflows::tables::IdentifierTables;
use tracing::info;

pub fn run(
    args: TranslateArgs,
    data_manager: &DataManager,
    progress: &CliProgressHandler,
) -> Result<()> {
    validate_output_path(&args.output)?;
    let tables_dir = tables_dir(&args.tables, data_manager)?;

    info!("Loading identifier tables from {:?}", &tables_dir);
    let tables = IdentifierTables::load(&tables_dir)?;

    info!("Loading model from {:?}", &args.model);
    let model = CobraJsonFile::read_from_path(&args.model).map_err(|source| {
        EngineError::ModelLoad {
            path: args.model.to_string_lossy().to_string(),
            source,
        }
    })?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let translated = merge::translate(&model, &tables, args.namespace.clone(), &reporter)?;

    merge::write_model(&translated, &args.output)?;
    println!(
        "✓ Model translated to {} and written to: {}",
        args.namespace,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn translate_without_tables_reports_missing_tables() {
        let dir = tempdir().unwrap();
        let model = dir.path().join("model.json");
        fs::write(&model, r#"{"id": "m"}"#).unwrap();

        let cli = Cli::parse_from([
            "metmerge",
            "translate",
            model.to_str().unwrap(),
            "--to",
            "bigg",
            "-o",
            dir.path().join("out.json").to_str().unwrap(),
            "--tables",
            dir.path().join("no-tables").to_str().unwrap(),
        ]);
        let Commands::Translate(args) = cli.command else {
            panic!("Expected 'translate' subcommand");
        };
        let manager = DataManager::with_custom_path(dir.path().to_path_buf());

        let err = run(args, &manager, &CliProgressHandler::hidden()).unwrap_err();
        assert!(matches!(err, crate::error::CliError::Tables(_)));
    }

    #[test]
    fn translate_writes_the_translated_model() {
        let dir = tempdir().unwrap();
        IdentifierTables::empty()
            .save(&dir.path().join("tables"))
            .unwrap();
        let model = dir.path().join("model.json");
        fs::write(
            &model,
            r#"{"id": "m", "metabolites": [{"id": "x_c", "compartment": "c"}]}"#,
        )
        .unwrap();
        let output = dir.path().join("out.json");

        let cli = Cli::parse_from([
            "metmerge",
            "translate",
            model.to_str().unwrap(),
            "--to",
            "seed",
            "-o",
            output.to_str().unwrap(),
            "--tables",
            dir.path().join("tables").to_str().unwrap(),
        ]);
        let Commands::Translate(args) = cli.command else {
            panic!("Expected 'translate' subcommand");
        };
        let manager = DataManager::with_custom_path(dir.path().to_path_buf());

        run(args, &manager, &CliProgressHandler::hidden()).unwrap();
        let translated = CobraJsonFile::read_from_path(&output).unwrap();
        assert_eq!(translated.metabolite_count(), 1);
        assert_eq!(translated.id(), "merged_m_trans_seed");
    }
}
