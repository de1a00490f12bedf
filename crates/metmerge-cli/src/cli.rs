use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use metmerge::core::identifiers::namespace::Namespace;
use metmerge::engine::config::ObjectiveMode;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "metmerge developers",
    version,
    about = "metmerge - resolve biochemical database identifiers and merge genome-scale metabolic models without duplicates.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the canonical identifier tables from the database feeds of a manifest.
    Build(BuildArgs),
    /// Merge several metabolic models into one deduplicated model.
    Merge(MergeArgs),
    /// Rename the metabolites and reactions of one model into a single namespace.
    Translate(TranslateArgs),
    /// Write the identifier tables as CSV files for inspection.
    Export(ExportArgs),
    /// Manage the local directory holding the identifier tables.
    Data(DataArgs),
}

/// Options shared by every command that reads or writes identifier tables.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Directory of the identifier tables. Defaults to the managed data directory.
    #[arg(long = "tables", value_name = "DIR")]
    pub tables_dir: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S merge.filler=#
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Manifest listing the feed files to ingest, in order.
    #[arg(short, long = "feeds", required = true, value_name = "PATH")]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub tables: TableArgs,

    /// Also write the CSV view of the new tables next to them.
    #[arg(long)]
    pub export_csv: bool,

    /// Override the number of agreeing properties required before a merge.
    #[arg(long, value_name = "INT")]
    pub min_agreeing_properties: Option<usize>,

    /// Override the mass tolerance used when comparing properties.
    #[arg(long, value_name = "FLOAT")]
    pub mass_tolerance: Option<f64>,
}

/// Arguments for the `merge` subcommand.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Model files in COBRA JSON format. The first one is the template.
    #[arg(required = true, num_args(1..), value_name = "MODEL")]
    pub models: Vec<PathBuf>,

    /// Path for the merged model (must end in .json).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub tables: TableArgs,

    /// Objective of the merged model: 'merge' to combine all objectives, or the
    /// 1-based position of the model whose objective is kept.
    #[arg(long, value_name = "MODE", value_parser = parser::parse_objective)]
    pub objective: Option<ObjectiveMode>,

    /// Compare reactions with their exact coefficients instead of directions only.
    #[arg(long)]
    pub exact_stoichiometry: bool,

    /// Keep protons in reaction comparisons.
    #[arg(long)]
    pub include_protonation: bool,

    /// Add every known database identifier to the merged annotations.
    #[arg(long)]
    pub extend_annotations: bool,

    /// Rename merged entities into this namespace (e.g. 'bigg').
    #[arg(long, value_name = "NAMESPACE")]
    pub translate_to: Option<Namespace>,

    /// Write a JSON report with similarity and provenance next to the output.
    #[arg(long)]
    pub stats: bool,
}

/// Arguments for the `translate` subcommand.
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Model file in COBRA JSON format.
    #[arg(required = true, value_name = "MODEL")]
    pub model: PathBuf,

    /// Target namespace (e.g. 'bigg', 'seed', 'metanetx').
    #[arg(long = "to", required = true, value_name = "NAMESPACE")]
    pub namespace: Namespace,

    /// Path for the translated model (must end in .json).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub tables: TableArgs,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory receiving the CSV files.
    #[arg(short, long = "output-dir", required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub tables: TableArgs,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Available commands for data management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the absolute path to the local data directory.
    Path,
    /// Set a custom absolute path for the local data directory.
    SetPath {
        /// The new path to use for storing identifier tables.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_parses_models_objective_and_namespace() {
        let cli = Cli::parse_from([
            "metmerge",
            "merge",
            "a.json",
            "b.json",
            "-o",
            "out.json",
            "--objective",
            "2",
            "--translate-to",
            "BiGG",
            "-S",
            "merge.filler=#",
        ]);
        let Commands::Merge(args) = cli.command else {
            panic!("Expected 'merge' subcommand");
        };
        assert_eq!(args.models.len(), 2);
        assert_eq!(args.objective, Some(ObjectiveMode::SelectOne(1)));
        assert_eq!(args.translate_to, Some(Namespace::Bigg));
        assert_eq!(args.tables.set_values, vec!["merge.filler=#".to_string()]);
    }

    #[test]
    fn merge_rejects_objective_index_zero() {
        let result = Cli::try_parse_from([
            "metmerge",
            "merge",
            "a.json",
            "-o",
            "out.json",
            "--objective",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["metmerge", "-v", "-q", "data", "path"]);
        assert!(result.is_err());
    }
}
