//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::ShellConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "DOSH_CONFIG";
pub const CLIENT_ID_ENV: &str = "DIGITALOCEAN_CLIENT_ID";
pub const API_KEY_ENV: &str = "DIGITALOCEAN_API_KEY";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store resolved from `DOSH_CONFIG` or `~/.dosh/config.yaml`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pinned to `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Load the file, then apply `.env` and environment credential overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_effective(&self) -> Result<ShellConfig> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ShellConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(ShellConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &ShellConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".dosh").join("config.yaml"))
    }
}

/// Credentials from the environment win over the file; empty values are ignored.
pub fn apply_env_overrides(config: &mut ShellConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(id) = lookup(CLIENT_ID_ENV).filter(|v| !v.is_empty()) {
        config.api.client_id = id;
    }
    if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
        config.api.api_key = key;
    }
}
