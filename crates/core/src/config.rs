//! Application configuration.
//!
//! Layered sources, lowest priority first: built-in defaults, an optional
//! TOML file under the platform config directory, then `GAMELIST_*`
//! environment variables (e.g. `GAMELIST_API_BASE_URL`).

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Fallback backend address when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Runtime configuration for the client.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the REST backend, without a trailing slash.
    pub api_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Default location of the config file, when a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gamelist").join("config.toml"))
    }

    /// Load configuration from the default file location plus environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// Load configuration, reading the file at `path` when present.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)
            .context("failed to set configuration defaults")?;

        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let settings = builder
            .add_source(Environment::with_prefix("GAMELIST"))
            .build()
            .context("failed to assemble configuration")?;

        settings
            .try_deserialize()
            .context("failed to deserialize configuration")
    }
}

/// Write a starter config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let Some(path) = AppConfig::default_path() else {
        return Ok(());
    };
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let contents = format!("api_base_url = \"{DEFAULT_API_BASE_URL}\"\n");
    fs::write(&path, contents)
        .with_context(|| format!("failed to write default config {}", path.display()))
}
