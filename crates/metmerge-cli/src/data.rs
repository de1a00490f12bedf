use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const TABLES_DIR: &str = "tables";

/// Locates the directory holding persisted identifier tables.
#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn with_custom_path(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.base_path.join(TABLES_DIR)
    }

    /// An explicit `--tables` directory wins over the managed one.
    pub fn resolve_tables_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(|| self.tables_dir(), Path::to_path_buf)
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        if !path.is_absolute() {
            return Err(CliError::Data(format!(
                "Data path must be absolute: {}",
                path.display()
            )));
        }
        let config_path = Self::get_path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        info!("Storing custom data path {:?} in {:?}", path, &config_path);
        fs::write(config_path, path.to_string_lossy().as_bytes()).map_err(CliError::from)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    fn determine_data_path() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) if config_path.exists() => {
                Self::read_custom_path(&config_path).map_or_else(Self::get_default_data_path, Ok)
            }
            _ => Self::get_default_data_path(),
        }
    }

    fn read_custom_path(config_path: &Path) -> Option<PathBuf> {
        match fs::read_to_string(config_path) {
            Ok(content) if !content.trim().is_empty() => Some(PathBuf::from(content.trim())),
            Ok(_) => {
                warn!("Custom path config file is empty, falling back to default path.");
                None
            }
            Err(e) => {
                warn!(
                    "Could not read custom path config file ({}), falling back to default path.",
                    e
                );
                None
            }
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("org", "metmerge", "metmerge")
            .ok_or_else(|| CliError::Data("Could not determine the home directory.".to_string()))
    }

    fn get_path_config_file() -> Result<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("path.conf"))
    }

    fn get_default_data_path() -> Result<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }
}
