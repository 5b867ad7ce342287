//! Configuration module for lindrive.
//!
//! Provides the typed configuration struct that maps to the JSON
//! configuration file, with loading, validation, and platform defaults.
//! A missing or unparsable config file is a hard error, unlike the state
//! file: running without a sync root makes no sense.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level configuration for lindrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for the local Drive mirror. `~` is expanded and the
    /// directory is created if absent.
    pub local_root_path: PathBuf,

    /// Remote folder names to restrict syncing to. Empty means everything.
    #[serde(default)]
    pub selective_sync_folders: Vec<String>,

    /// Path of the persisted state mapping file.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Path of the persisted OAuth token file.
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,

    /// OAuth client ID used to refresh the access token.
    #[serde(default)]
    pub oauth_client_id: Option<String>,

    /// OAuth client secret, when the installed-app registration has one.
    #[serde(default)]
    pub oauth_client_secret: Option<String>,
}

fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lindrive")
        .join("state.json")
}

fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lindrive")
        .join("token.json")
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    ///
    /// Validates `local_root_path`, expands a leading `~`, resolves the
    /// result to an absolute path, and creates the directory if it does
    /// not exist.
    ///
    /// # Errors
    /// Fails if the file is missing or unparsable, if `local_root_path`
    /// is empty, or if the root directory cannot be created.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if config.local_root_path.as_os_str().is_empty() {
            anyhow::bail!("Missing 'local_root_path' in config");
        }

        config.local_root_path = expand_and_absolutize(&config.local_root_path)?;

        if !config.local_root_path.exists() {
            std::fs::create_dir_all(&config.local_root_path).with_context(|| {
                format!(
                    "Failed to create sync root {}",
                    config.local_root_path.display()
                )
            })?;
        }

        debug!(
            root = %config.local_root_path.display(),
            selective = config.selective_sync_folders.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/lindrive/config.json` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("lindrive")
            .join("config.json")
    }
}

/// Expand a leading `~` to the user's home directory and resolve the path
/// to an absolute one (relative paths are anchored at the current
/// directory).
fn expand_and_absolutize(path: &Path) -> anyhow::Result<PathBuf> {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().context("Cannot expand '~': no home directory")?;
            home.join(rest)
        }
        Err(_) => path.to_path_buf(),
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        let cwd = std::env::current_dir().context("Cannot resolve relative path: no cwd")?;
        Ok(cwd.join(expanded))
    }
}
