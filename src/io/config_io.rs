use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::PlannerConfig;

/// Directory under `~/Documents` the task file lives in by default
const APP_DIR_NAME: &str = "Year_Planner";
const TASKS_FILE_NAME: &str = "tasks.json";

/// Error type for reading the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("planner").join("config.toml")
}

/// Default location of the task file: `~/Documents/Year_Planner/tasks.json`
pub fn default_tasks_path() -> PathBuf {
    dirs_home()
        .join("Documents")
        .join(APP_DIR_NAME)
        .join(TASKS_FILE_NAME)
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config from a specific path. A missing file gives the defaults.
pub fn read_config_from(path: &Path) -> Result<PlannerConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PlannerConfig::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read the config from the default location.
pub fn read_config() -> Result<PlannerConfig, ConfigError> {
    read_config_from(&config_path())
}

impl PlannerConfig {
    /// Task file to use: the configured one, or the default location.
    /// A leading `~/` is expanded against the home directory.
    pub fn tasks_path(&self) -> PathBuf {
        match &self.storage.file {
            Some(path) => match path.strip_prefix("~") {
                Ok(rest) => dirs_home().join(rest),
                Err(_) => path.clone(),
            },
            None => default_tasks_path(),
        }
    }
}
