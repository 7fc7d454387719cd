use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "AEDB_CONFIG";

/// Defaults applied when the command line does not say otherwise.
///
/// ```toml
/// table_prefix = "pri"
/// required_file_ext = "pridb"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub table_prefix: Option<String>,
    #[serde(default)]
    pub required_file_ext: Option<String>,
}

impl Config {
    /// Load from the explicit path, `AEDB_CONFIG`, or the user config
    /// directory, in that order. Only an explicit path has to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(env_path));
        }
        dirs::config_dir().map(|dir| dir.join("aedb").join("config.toml"))
    }
}
