//! Where the app keeps its files and how chatty its log is.
//!
//! Both settings come from the environment so a test run or a second profile
//! can point at its own directory:
//!
//! * `JOKE_VIEW_HOME` overrides the data directory (default `~/.joke-view`),
//! * `JOKE_VIEW_LOG` is a `tracing` filter directive (default `info`).

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".joke-view";
const DB_FILE_NAME: &str = "jokes.db";
const PREFERENCES_FILE_NAME: &str = "preferences.json";
const LOG_FILE_NAME: &str = "joke-view.log";

pub const HOME_ENV: &str = "JOKE_VIEW_HOME";
pub const LOG_ENV: &str = "JOKE_VIEW_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };
        let log_filter = env::var(LOG_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            log_filter,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
