//! Install-level configuration.
//!
//! Stored as TOML at:
//!   %APPDATA%/prefpatch/config.toml on Windows
//!   $XDG_CONFIG_HOME/prefpatch/config.toml on Linux
//!   ~/Library/Application Support/prefpatch/config.toml on macOS
//!
//! The `PREFPATCH_HOME` environment variable overrides both the config
//! location and the home directory used for default search roots, which is
//! how tests sandbox a run. Search roots are configured relative to home
//! and resolved at load time; an empty list means the built-in layouts.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment override for the home directory (config + search roots).
pub const HOME_ENV_VAR: &str = "PREFPATCH_HOME";

/// Standard file name of the config file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Product label used in the backup directory name and file header.
    #[serde(default = "default_product_label")]
    pub product_label: String,
    /// Search roots relative to the home directory, in priority order.
    /// Empty means the built-in native-then-sandboxed layouts.
    #[serde(default)]
    pub search_roots: Vec<PathBuf>,
    /// Where snapshot directories are created. Defaults to the resolved
    /// installation root when unset.
    #[serde(default)]
    pub backup_root: Option<PathBuf>,
    /// File name of the override file inside the profile directory.
    #[serde(default = "default_override_file_name")]
    pub override_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            product_label: default_product_label(),
            search_roots: Vec::new(),
            backup_root: None,
            override_file_name: default_override_file_name(),
        }
    }
}

fn default_product_label() -> String {
    "browser".to_string()
}

fn default_override_file_name() -> String {
    "overrides.js".to_string()
}

/// Returns the home directory all relative paths resolve against.
pub fn home_root() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS home directory")?;
    Ok(base_dirs.home_dir().to_path_buf())
}

/// Returns the directory holding the config file.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV_VAR) {
        return Ok(PathBuf::from(path).join("config"));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS config directory")?;
    Ok(base_dirs.config_dir().join("prefpatch"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}

/// Resolves the configured search roots against the given home directory,
/// falling back to the built-in layouts: native install first, then the
/// snap- and flatpak-style sandboxed package variants.
pub fn resolved_search_roots(config: &AppConfig, home: &Path) -> Vec<PathBuf> {
    let relative: Vec<PathBuf> = if config.search_roots.is_empty() {
        let label = &config.product_label;
        vec![
            PathBuf::from(format!(".{label}")),
            PathBuf::from(format!("snap/{label}/common/.{label}")),
            PathBuf::from(format!(".var/app/{label}/.{label}")),
        ]
    } else {
        config.search_roots.clone()
    };
    relative
        .into_iter()
        .map(|p| if p.is_absolute() { p } else { home.join(p) })
        .collect()
}
