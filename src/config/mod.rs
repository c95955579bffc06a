pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/laptop-rank/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("laptop-rank"))
}

/// Get the default config file path (~/.config/laptop-rank/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Owner used when neither --owner nor the config names one:
/// the login name from the environment, else "default"
pub fn default_owner() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "default".to_string())
}

/// Pick the owner: explicit flag, then config, then environment
pub fn resolve_owner(flag: Option<String>, config: &Config) -> String {
    flag.or_else(|| config.owner.clone())
        .unwrap_or_else(default_owner)
}

/// Pick the catalog file: explicit flag, then config, then default path
pub fn resolve_catalog_path(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match flag.or_else(|| config.catalog.as_ref().map(PathBuf::from)) {
        Some(path) => Ok(path),
        None => crate::catalog::get_catalog_path(),
    }
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/laptop-rank/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error; an empty config is
/// returned so that catalog commands work before any weights are set.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    tracing::debug!(path = %config_path.display(), "config loaded");
    Ok(config)
}

/// Like [`load_config`], but an explicit path that does not exist yet is
/// treated as an empty config. For commands that create the config file.
pub fn load_config_or_default(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(p) if !p.exists() => {
            tracing::debug!(path = %p.display(), "config will be created");
            Ok(Config::default())
        }
        other => load_config(other),
    }
}

/// Write configuration as YAML, replacing the file atomically.
///
/// The whole weight table is written in one go, so a reader sees either the
/// old weights or the new ones.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "config saved");
    Ok(())
}
