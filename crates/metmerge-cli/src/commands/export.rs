use crate::cli::ExportArgs;
use crate::config::tables_dir;
use crate::data::DataManager;
use crate::error::Result;
use metmerge::engine::error::EngineError;
use metmerge::workflows::tables::IdentifierTables;
use tracing::info;

pub fn run(args: ExportArgs, data_manager: &DataManager) -> Result<()> {
    let tables_dir = tables_dir(&args.tables, data_manager)?;
    info!("Loading identifier tables from {:?}", &tables_dir);
    let tables = IdentifierTables::load(&tables_dir)?;

    let written = tables
        .export_csv(&args.output_dir)
        .map_err(EngineError::from)?;
    for path in written {
        println!("✓ CSV view written to: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn export_writes_both_tables_from_the_managed_directory() {
        let dir = tempdir().unwrap();
        let manager = DataManager::with_custom_path(dir.path().to_path_buf());
        IdentifierTables::empty().save(&manager.tables_dir()).unwrap();
        let output_dir = dir.path().join("csv");

        let cli = Cli::parse_from([
            "metmerge",
            "export",
            "--output-dir",
            output_dir.to_str().unwrap(),
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("Expected 'export' subcommand");
        };

        run(args, &manager).unwrap();
        assert!(output_dir.join("metabolites-table.csv").exists());
        assert!(output_dir.join("reactions-table.csv").exists());
    }
}
