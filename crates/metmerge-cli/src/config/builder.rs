use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileKindPolicy};
use super::models::{MergeAppConfig, ResolutionAppConfig};
use crate::cli::{BuildArgs, MergeArgs, TableArgs};
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::parser;
use metmerge::core::identifiers::namespace::{EntityKind, Namespace};
use metmerge::engine::config as core_config;
use std::path::PathBuf;
use std::str::FromStr;

pub fn build_resolution_config(
    args: &BuildArgs,
    data_manager: &DataManager,
) -> Result<ResolutionAppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_with_overrides(&args.tables)?;
    let tables_dir = resolve_tables_dir(&args.tables, &file_config, data_manager);

    let resolution_file = file_config.resolution.take().unwrap_or_default();

    let mut builder = core_config::ResolutionConfigBuilder::new()
        .min_agreeing_properties(
            args.min_agreeing_properties
                .or(resolution_file.min_agreeing_properties)
                .unwrap_or(defaults.min_agreeing_properties),
        )
        .mass_tolerance(
            args.mass_tolerance
                .or(resolution_file.mass_tolerance)
                .unwrap_or(defaults.mass_tolerance),
        )
        .skip_same_namespace_links(
            resolution_file
                .skip_same_namespace_links
                .unwrap_or(defaults.skip_same_namespace_links),
        );

    for (kind, policy) in [
        (EntityKind::Metabolite, resolution_file.metabolites),
        (EntityKind::Reaction, resolution_file.reactions),
    ] {
        let Some(FileKindPolicy {
            require_corroboration,
            namespace_preference,
        }) = policy
        else {
            continue;
        };
        if let Some(required) = require_corroboration {
            builder = builder.require_corroboration(kind, required);
        }
        if let Some(preference) = namespace_preference {
            builder = builder.namespace_preference(kind, parse_namespaces(&preference)?);
        }
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ResolutionAppConfig {
        tables_dir,
        core_config,
    })
}

pub fn build_merge_config(args: &MergeArgs, data_manager: &DataManager) -> Result<MergeAppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_with_overrides(&args.tables)?;
    let tables_dir = resolve_tables_dir(&args.tables, &file_config, data_manager);

    let merge_file = file_config.merge.take().unwrap_or_default();

    let objective = match (args.objective, merge_file.objective.as_deref()) {
        (Some(mode), _) => mode,
        (None, Some(value)) => parser::parse_objective(value)?,
        (None, None) => defaults.objective,
    };
    let translate_to = match (&args.translate_to, merge_file.translate_to.as_deref()) {
        (Some(namespace), _) => Some(namespace.clone()),
        (None, Some(value)) => Some(parse_namespace(value)?),
        (None, None) => None,
    };
    // Switches can only turn an option on; off falls back to the file.
    let switch = |flag: bool, file_val: Option<bool>, default: bool| {
        flag || file_val.unwrap_or(default)
    };

    let mut builder = core_config::MergeConfigBuilder::new()
        .objective(objective)
        .exact_stoichiometry(switch(
            args.exact_stoichiometry,
            merge_file.exact_stoichiometry,
            defaults.exact_stoichiometry,
        ))
        .include_protonation(switch(
            args.include_protonation,
            merge_file.include_protonation,
            defaults.include_protonation,
        ))
        .extend_annotations(switch(
            args.extend_annotations,
            merge_file.extend_annotations,
            defaults.extend_annotations,
        ))
        .proton_identifier(
            merge_file
                .proton_identifier
                .as_deref()
                .unwrap_or(&defaults.proton_identifier),
        )
        .boundary_suffix(
            merge_file
                .boundary_suffix
                .as_deref()
                .unwrap_or(&defaults.boundary_suffix),
        )
        .proton_motive_force_name(
            merge_file
                .proton_motive_force_name
                .as_deref()
                .unwrap_or(&defaults.proton_motive_force_name),
        )
        .filler(merge_file.filler.unwrap_or(defaults.filler));
    if let Some(namespace) = translate_to {
        builder = builder.translate_to(namespace);
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(MergeAppConfig {
        tables_dir,
        core_config,
    })
}

/// Tables directory for commands that only read or write tables.
pub fn tables_dir(args: &TableArgs, data_manager: &DataManager) -> Result<PathBuf> {
    let file_config = load_with_overrides(args)?;
    Ok(resolve_tables_dir(args, &file_config, data_manager))
}

fn load_with_overrides(args: &TableArgs) -> Result<FileConfig> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    apply_set_values(file_config, &args.set_values)
}

fn resolve_tables_dir(args: &TableArgs, file: &FileConfig, data_manager: &DataManager) -> PathBuf {
    data_manager.resolve_tables_dir(args.tables_dir.as_deref().or(file.tables_dir.as_deref()))
}

fn parse_namespace(value: &str) -> Result<Namespace> {
    Namespace::from_str(value)
        .map_err(|e| CliError::Config(format!("Invalid namespace '{}': {}", value, e)))
}

fn parse_namespaces(values: &[String]) -> Result<Vec<Namespace>> {
    values.iter().map(|value| parse_namespace(value)).collect()
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = parser::parse_key_value(kv_pair)?;

        if key == "tables-dir" {
            config.tables_dir = Some(PathBuf::from(value));
            continue;
        }
        if let Some(field) = key.strip_prefix("resolution.") {
            let resolution = config.resolution.get_or_insert_with(Default::default);
            match field {
                "min-agreeing-properties" => {
                    resolution.min_agreeing_properties = Some(parse_value(key, value)?)
                }
                "mass-tolerance" => resolution.mass_tolerance = Some(parse_value(key, value)?),
                "skip-same-namespace-links" => {
                    resolution.skip_same_namespace_links = Some(parse_value(key, value)?)
                }
                "metabolites.require-corroboration" => {
                    resolution
                        .metabolites
                        .get_or_insert_with(Default::default)
                        .require_corroboration = Some(parse_value(key, value)?)
                }
                "reactions.require-corroboration" => {
                    resolution
                        .reactions
                        .get_or_insert_with(Default::default)
                        .require_corroboration = Some(parse_value(key, value)?)
                }
                "metabolites.namespace-preference" => {
                    resolution
                        .metabolites
                        .get_or_insert_with(Default::default)
                        .namespace_preference = Some(parse_list(value))
                }
                "reactions.namespace-preference" => {
                    resolution
                        .reactions
                        .get_or_insert_with(Default::default)
                        .namespace_preference = Some(parse_list(value))
                }
                _ => return Err(unsupported_key(key)),
            }
            continue;
        }
        if let Some(field) = key.strip_prefix("merge.") {
            let merge = config.merge.get_or_insert_with(Default::default);
            match field {
                "objective" => merge.objective = Some(value.to_string()),
                "exact-stoichiometry" => merge.exact_stoichiometry = Some(parse_value(key, value)?),
                "include-protonation" => merge.include_protonation = Some(parse_value(key, value)?),
                "extend-annotations" => merge.extend_annotations = Some(parse_value(key, value)?),
                "translate-to" => merge.translate_to = Some(value.to_string()),
                "proton-identifier" => merge.proton_identifier = Some(value.to_string()),
                "boundary-suffix" => merge.boundary_suffix = Some(value.to_string()),
                "proton-motive-force-name" => {
                    merge.proton_motive_force_name = Some(value.to_string())
                }
                "filler" => merge.filler = Some(parse_value(key, value)?),
                _ => return Err(unsupported_key(key)),
            }
            continue;
        }
        return Err(unsupported_key(key));
    }
    Ok(config)
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}
