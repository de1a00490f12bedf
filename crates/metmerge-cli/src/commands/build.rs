use crate::cli::BuildArgs;
use crate::config::build_resolution_config;
use crate::data::DataManager;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use metmerge::core::identifiers::namespace::EntityKind;
use metmerge::core::io::feeds::FeedManifest;
use metmerge::engine::error::EngineError;
use metmerge::engine::progress::ProgressReporter;
use metmerge::workflows::build::{BuildOutput, build_identifier_tables};
use tracing::{info, warn};

pub fn run(
    args: BuildArgs,
    data_manager: &DataManager,
    progress: &CliProgressHandler,
) -> Result<()> {
    let app_config = build_resolution_config(&args, data_manager)?;

    info!("Loading feed manifest from {:?}", &args.manifest);
    let manifest = FeedManifest::load(&args.manifest).map_err(EngineError::from)?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    println!("Building identifier tables from {} feed(s)...", manifest.feeds.len());
    let output = build_identifier_tables(&manifest, &app_config.core_config, &reporter)?;

    info!("Saving identifier tables to {:?}", &app_config.tables_dir);
    output
        .tables
        .save(&app_config.tables_dir)
        .map_err(EngineError::from)?;
    print_summary(&output);
    println!(
        "✓ Identifier tables written to: {}",
        app_config.tables_dir.display()
    );

    if args.export_csv {
        let written = output
            .tables
            .export_csv(&app_config.tables_dir)
            .map_err(EngineError::from)?;
        for path in written {
            println!("  CSV view written to: {}", path.display());
        }
    }

    report_failures(&output);
    Ok(())
}

fn print_summary(output: &BuildOutput) {
    for kind in [EntityKind::Metabolite, EntityKind::Reaction] {
        let table = output.tables.get(kind);
        let stats = output.stats(kind);
        println!(
            "  {:<11} {} canonical ids, {} identifiers ({} merges, {} declined, {} dropped claims)",
            format!("{}s:", kind),
            table.len(),
            table.index_len(),
            stats.merges,
            stats.declined_merges,
            stats.dropped_claims
        );
    }
}

fn report_failures(output: &BuildOutput) {
    let rejected = output.rejected_rows();
    if rejected > 0 {
        println!("Skipped {} malformed row(s):", rejected);
        for feed in output.feeds.iter().filter(|feed| !feed.rejected.is_empty()) {
            for error in &feed.rejected {
                info!(path = %feed.path.display(), "{}", error);
            }
            println!("  {}: {} row(s)", feed.path.display(), feed.rejected.len());
        }
    }

    if !output.failures.is_empty() {
        warn!("{} feed(s) could not be read.", output.failures.len());
        println!("Warning: {} feed(s) were skipped:", output.failures.len());
        for failure in &output.failures {
            println!("  {}", failure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use metmerge::workflows::tables::IdentifierTables;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn build_writes_tables_and_csv_despite_missing_feeds() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("reactions.tsv"),
            "id\tco-ids\nbigg:PGI\tmetanetx:MNXR102535;kegg:R02740\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("feeds.toml"),
            r#"
            [[feed]]
            kind = "reaction"
            format = "records"
            path = "reactions.tsv"

            [[feed]]
            kind = "metabolite"
            format = "records"
            path = "absent.tsv"
            "#,
        )
        .unwrap();
        let tables_dir = dir.path().join("tables");

        let cli = Cli::parse_from([
            "metmerge",
            "build",
            "--feeds",
            dir.path().join("feeds.toml").to_str().unwrap(),
            "--tables",
            tables_dir.to_str().unwrap(),
            "--export-csv",
        ]);
        let Commands::Build(args) = cli.command else {
            panic!("Expected 'build' subcommand");
        };
        let manager = DataManager::with_custom_path(dir.path().join("unused"));

        run(args, &manager, &CliProgressHandler::hidden()).unwrap();

        let tables = IdentifierTables::load(&tables_dir).unwrap();
        assert_eq!(tables.reactions.lookup("PGI"), tables.reactions.lookup("R02740"));
        assert!(tables.metabolites.is_empty());
        assert!(tables_dir.join("reactions-table.csv").exists());
    }

    #[test]
    fn build_fails_on_missing_manifest() {
        let dir = tempdir().unwrap();
        let cli = Cli::parse_from([
            "metmerge",
            "build",
            "--feeds",
            dir.path().join("absent.toml").to_str().unwrap(),
        ]);
        let Commands::Build(args) = cli.command else {
            panic!("Expected 'build' subcommand");
        };
        let manager = DataManager::with_custom_path(dir.path().to_path_buf());

        assert!(run(args, &manager, &CliProgressHandler::hidden()).is_err());
    }
}
