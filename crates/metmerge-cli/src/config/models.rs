use metmerge::engine::config::{MergeConfig, ResolutionConfig};
use std::path::PathBuf;

pub struct ResolutionAppConfig {
    pub tables_dir: PathBuf,
    pub core_config: ResolutionConfig,
}

pub struct MergeAppConfig {
    pub tables_dir: PathBuf,
    pub core_config: MergeConfig,
}
