//! Configuration loading and management
//!
//! Handles parsing of `.trk.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".trk.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data file holding the persisted board
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Status given to new items when none is specified
    #[serde(default = "default_status")]
    pub default_status: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            default_status: default_status(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("trk.csv")
}

fn default_status() -> String {
    "new".to_string()
}

impl Config {
    /// Load configuration from `.trk.toml` in `dir`, falling back to
    /// defaults when the file is absent.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the current working directory.
    pub fn load() -> Result<Self> {
        match std::env::current_dir() {
            Ok(dir) => Self::load_from_dir(&dir),
            Err(_) => Ok(Self::default()),
        }
    }
}
