//! Configuration loaded from `finder.toml`.
//!
//! ```toml
//! [database]
//! url = "postgres://localhost/app"
//! max_connections = 5
//!
//! [output]
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FinderError, FinderResult};

/// File name searched for in the working directory and the user config dir.
pub const CONFIG_FILE: &str = "finder.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub database: DatabaseConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FinderConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> FinderResult<Self> {
        toml::from_str(content).map_err(|e| FinderError::Config(e.to_string()))
    }

    /// Load a config file.
    pub fn load_from(path: &Path) -> FinderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| FinderError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the first config found: explicit path, `./finder.toml`, then
    /// `<config dir>/finder/finder.toml`. Falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> FinderResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        for path in Self::search_paths() {
            if path.is_file() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("finder").join(CONFIG_FILE));
        }
        paths
    }
}
