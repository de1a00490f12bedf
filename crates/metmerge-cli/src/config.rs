//! Layered configuration: TOML file, then `--set` overrides, then explicit
//! flags, then built-in defaults.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_merge_config, build_resolution_config, tables_dir};
