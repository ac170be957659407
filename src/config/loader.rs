// Configuration loader
// Loads ~/.copechat/config.toml, then applies environment overrides

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Config;
use crate::errors::config_parse_error;

/// Location of the user config file
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".copechat").join("config.toml"))
}

/// Load configuration from the default config file and environment
pub fn load_config() -> Result<Config> {
    load_config_from(&default_config_path()?)
}

/// Load configuration from `path` (if it exists) and environment
pub fn load_config_from(path: &Path) -> Result<Config> {
    let mut config = match read_config_file(path)? {
        Some(config) => config,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: Config =
        toml::from_str(&contents).map_err(|e| anyhow!(config_parse_error(&e.to_string())))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

/// Apply `OPENAI_API_KEY`, `COPECHAT_MODEL` and `COPECHAT_DATA_DIR`
///
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(api_key) = var("OPENAI_API_KEY") {
        config.api_key = api_key;
    }
    if let Some(model) = var("COPECHAT_MODEL") {
        config.model = model;
    }
    if let Some(data_dir) = var("COPECHAT_DATA_DIR") {
        config.data_dir = PathBuf::from(data_dir);
    }
}
