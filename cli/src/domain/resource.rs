//! Entity records fetched from the remote API.
//!
//! Each collection kind has its own fixed field set; nothing here does
//! reflective field lookup. Records are immutable snapshots of remote state
//! at fetch time.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::ShellError;

/// Action status reported by an event once it will not change further.
pub const TERMINAL_STATUS: &str = "done";

/// Hostname rule applied to droplet names before any API call.
pub static DROPLET_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.-]{0,253}[A-Za-z0-9])?$").expect("valid regex")
});

// ── Collection keys ───────────────────────────────────────────────────────────

/// The fixed set of cacheable collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKey {
    Sizes,
    Regions,
    Snapshots,
    Droplets,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 4] = [
        CollectionKey::Sizes,
        CollectionKey::Regions,
        CollectionKey::Snapshots,
        CollectionKey::Droplets,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sizes => "sizes",
            Self::Regions => "regions",
            Self::Snapshots => "snapshots",
            Self::Droplets => "droplets",
        }
    }

    /// Column names rendered for this collection, in order.
    #[must_use]
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Sizes | Self::Regions | Self::Snapshots => &["id", "name"],
            Self::Droplets => &[
                "id",
                "name",
                "ip_address",
                "status",
                "locked",
                "created_at",
                "size_id",
                "region_id",
            ],
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown collection '{s}' (expected sizes, regions, snapshots or droplets)")
            })
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: u64,
    pub name: String,
}

/// A snapshot or image owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub distribution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    pub id: u64,
    pub name: String,
}

/// Power/lifecycle status of a droplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropletStatus {
    New,
    Active,
    Off,
    Archive,
    #[serde(other)]
    Unknown,
}

impl DropletStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::Off => "off",
            Self::Archive => "archive",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Droplet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub status: DropletStatus,
    /// Set by the remote system while an operation on the droplet is in flight.
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub size_id: u64,
    pub region_id: u64,
    #[serde(default)]
    pub image_id: Option<u64>,
}

/// Payload returned by droplet creation. Smaller than [`Droplet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedDroplet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image_id: Option<u64>,
    #[serde(default)]
    pub size_id: Option<u64>,
    #[serde(default)]
    pub event_id: Option<u64>,
}

/// Status record of a remote asynchronous job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: u64,
    #[serde(default)]
    pub action_status: Option<String>,
    /// Percentage complete, 0 when the API reports none.
    #[serde(default, deserialize_with = "de_percentage")]
    pub percentage: u8,
    #[serde(default)]
    pub droplet_id: Option<u64>,
    #[serde(default)]
    pub event_type_id: Option<u64>,
}

impl JobStatus {
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.action_status.as_deref() == Some(TERMINAL_STATUS)
    }
}

/// The API sends percentage as a string, a number, or null.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn de_percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    use serde::de::Error as _;
    use serde_json::Value;

    let raw = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid percentage '{s}': {e}")))?,
        Some(other) => {
            return Err(D::Error::custom(format!(
                "invalid percentage {other}"
            )));
        }
    };
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}

// ── Record ────────────────────────────────────────────────────────────────────

/// One entry of a cached collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Size(Size),
    Region(Region),
    Snapshot(Image),
    Droplet(Droplet),
}

impl Record {
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::Size(s) => s.id,
            Self::Region(r) => r.id,
            Self::Snapshot(i) => i.id,
            Self::Droplet(d) => d.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Size(s) => &s.name,
            Self::Region(r) => &r.name,
            Self::Snapshot(i) => &i.name,
            Self::Droplet(d) => &d.name,
        }
    }

    /// Cell values matching [`CollectionKey::columns`] for this record's kind.
    #[must_use]
    pub fn cells(&self) -> Vec<String> {
        match self {
            Self::Size(_) | Self::Region(_) | Self::Snapshot(_) => {
                vec![self.id().to_string(), self.name().to_string()]
            }
            Self::Droplet(d) => vec![
                d.id.to_string(),
                d.name.clone(),
                d.ip_address.clone().unwrap_or_else(|| "-".to_string()),
                d.status.as_str().to_string(),
                d.locked.to_string(),
                d.created_at
                    .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
                d.size_id.to_string(),
                d.region_id.to_string(),
            ],
        }
    }
}

// ── Droplet creation ──────────────────────────────────────────────────────────

/// Parameters for creating a droplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropletSpec {
    pub name: String,
    pub size_id: u64,
    pub image_id: u64,
    pub region_id: u64,
    pub ssh_key_ids: Vec<u64>,
    pub private_networking: bool,
    pub backups_enabled: bool,
}

impl DropletSpec {
    /// SSH key ids in the comma-joined form the API expects.
    #[must_use]
    pub fn joined_ssh_key_ids(&self) -> String {
        self.ssh_key_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Validate a droplet name against [`DROPLET_NAME_RE`].
///
/// # Errors
///
/// Returns [`ShellError::InvalidName`] when the name is not a valid hostname.
pub fn validate_droplet_name(name: &str) -> Result<(), ShellError> {
    if DROPLET_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(ShellError::InvalidName(name.to_string()))
    }
}
