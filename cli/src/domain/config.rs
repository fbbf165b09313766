//! Domain types and validators for dosh configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api.url",
    "api.client_id",
    "api.api_key",
    "polling.interval_secs",
    "droplet.default_name",
    "snapshot.name_format",
];

pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v1";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.dosh/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub droplet: DropletDefaults,
    pub snapshot: SnapshotDefaults,
}

/// Remote API endpoint and credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    pub client_id: String,
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            client_id: String::new(),
            api_key: String::new(),
        }
    }
}

/// Background polling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollingConfig {
    /// Fixed delay between two status fetches.
    pub interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_secs: 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DropletDefaults {
    pub default_name: String,
}

impl Default for DropletDefaults {
    fn default() -> Self {
        Self {
            default_name: "work".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SnapshotDefaults {
    /// `chrono` format string applied to today's date.
    pub name_format: String,
}

impl Default for SnapshotDefaults {
    fn default() -> Self {
        Self {
            name_format: "%d/%m".to_string(),
        }
    }
}

impl ShellConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api.client_id.is_empty() && !self.api.api_key.is_empty()
    }

    /// Default snapshot name for `today`, e.g. `17/10`.
    ///
    /// Falls back to `%d/%m` when the configured format cannot be rendered.
    #[must_use]
    pub fn default_snapshot_name(&self, today: NaiveDate) -> String {
        use std::fmt::Write as _;
        let mut name = String::new();
        if write!(name, "{}", today.format(&self.snapshot.name_format)).is_err() {
            return today.format("%d/%m").to_string();
        }
        name
    }

    /// Ensure credentials are present before any API call.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] if either credential is empty.
    pub fn require_credentials(&self) -> Result<()> {
        if self.has_credentials() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials.into())
        }
    }

    /// Set a whitelisted key after validating its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "api.url" => self.api.url = value.trim_end_matches('/').to_string(),
            "api.client_id" => self.api.client_id = value.to_string(),
            "api.api_key" => self.api.api_key = value.to_string(),
            "polling.interval_secs" => self.polling.interval_secs = value.parse()?,
            "droplet.default_name" => self.droplet.default_name = value.to_string(),
            "snapshot.name_format" => self.snapshot.name_format = value.to_string(),
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| -> anyhow::Error {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };
    match key {
        "api.url" if !(value.starts_with("https://") || value.starts_with("http://")) => {
            Err(invalid("Must be an http(s) URL."))
        }
        "polling.interval_secs" => match value.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(()),
            _ => Err(invalid("Must be a whole number of seconds, at least 1.")),
        },
        "droplet.default_name" => crate::domain::resource::validate_droplet_name(value)
            .map_err(|e| invalid(&e.to_string())),
        "snapshot.name_format" if value.trim().is_empty() => Err(invalid("Must not be empty.")),
        "snapshot.name_format"
            if chrono::format::StrftimeItems::new(value)
                .any(|item| matches!(item, chrono::format::Item::Error)) =>
        {
            Err(invalid("Not a valid date format (see strftime)."))
        }
        _ => Ok(()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
