//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::ShellConfig;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the stored configuration cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<ShellConfig> {
    store.load()
}

/// Validate and apply `key = value`, then persist.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the save fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<ShellConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}
