//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.
//!
//! The remote API ports are synchronous: pollers call them from blocking
//! threads, and the shell calls them between prompts.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{
    ApiResponse, CollectionKey, Droplet, DropletSpec, Image, JobStatus, Record, Region,
    ShellConfig, Size, SshKey,
};

// ── Remote API Port Traits ────────────────────────────────────────────────────

/// Read-only collection listings. Each call is one remote round-trip.
pub trait CollectionSource {
    fn list_sizes(&self) -> Result<Vec<Size>>;
    fn list_regions(&self) -> Result<Vec<Region>>;
    /// Snapshots and private images owned by the account.
    fn list_snapshots(&self) -> Result<Vec<Image>>;
    fn list_droplets(&self) -> Result<Vec<Droplet>>;
    fn list_ssh_keys(&self) -> Result<Vec<SshKey>>;
}

/// Mutating calls. Results are raw envelopes; callers run them through
/// `domain::validate`.
pub trait DropletActions {
    fn create_droplet(&self, spec: &DropletSpec) -> Result<ApiResponse>;
    fn destroy_droplet(&self, id: u64) -> Result<ApiResponse>;
    fn snapshot_droplet(&self, id: u64, name: &str) -> Result<ApiResponse>;
    fn power_off_droplet(&self, id: u64) -> Result<ApiResponse>;
    fn power_on_droplet(&self, id: u64) -> Result<ApiResponse>;
    fn reboot_droplet(&self, id: u64) -> Result<ApiResponse>;
    fn shutdown_droplet(&self, id: u64) -> Result<ApiResponse>;
    fn destroy_snapshot(&self, id: u64) -> Result<ApiResponse>;
}

/// Single-entity lookups used by the pollers.
pub trait StatusSource {
    fn find_droplet(&self, id: u64) -> Result<Droplet>;
    fn find_snapshot(&self, id: u64) -> Result<Image>;
    fn find_event(&self, id: u64) -> Result<JobStatus>;
}

/// Composite trait — any type implementing all three sub-traits is a `CloudApi`.
pub trait CloudApi: CollectionSource + DropletActions + StatusSource {}

/// Blanket implementation: any type implementing all three sub-traits is a `CloudApi`.
impl<T> CloudApi for T where T: CollectionSource + DropletActions + StatusSource {}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Shared with background pollers,
/// hence `Send + Sync`.
pub trait ProgressReporter: Send + Sync {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a completion percentage for the task named `label`.
    fn progress(&self, label: &str, percentage: u8);
}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Line input from the user.
pub trait Prompter {
    /// Ask for a value; empty input yields `default`.
    fn read_value(&self, prompt: &str, default: &str) -> Result<String>;
    /// Ask a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Presents a collection to the user before a selection is made.
pub trait CollectionView {
    fn show(&self, key: CollectionKey, records: &[Record]);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the stored configuration, or defaults when none exists.
    fn load(&self) -> Result<ShellConfig>;
    /// Persist the given configuration.
    fn save(&self, config: &ShellConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
