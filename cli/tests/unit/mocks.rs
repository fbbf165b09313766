//! Shared fake collaborators for unit tests.
//!
//! `FakeCloud` implements the remote API ports over scripted queues and
//! records every call in order.

#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use serde_json::json;

use droplet_shell::application::ports::{
    CollectionSource, CollectionView, DropletActions, ProgressReporter, Prompter, StatusSource,
};
use droplet_shell::domain::{
    ApiResponse, CollectionKey, Droplet, DropletSpec, DropletStatus, Image, JobStatus, Record,
    Region, Size, SshKey,
};

pub fn droplet(id: u64, locked: bool) -> Droplet {
    Droplet {
        id,
        name: format!("droplet-{id}"),
        ip_address: None,
        status: DropletStatus::Active,
        locked,
        created_at: None,
        size_id: 66,
        region_id: 1,
        image_id: None,
    }
}

pub fn event(id: u64, action_status: &str, percentage: u8) -> JobStatus {
    JobStatus {
        id,
        action_status: Some(action_status.to_string()),
        percentage,
        droplet_id: None,
        event_type_id: None,
    }
}

#[derive(Default)]
pub struct FakeCloud {
    pub calls: Mutex<Vec<String>>,
    pub sizes: Vec<Size>,
    pub snapshots: Vec<Image>,
    pub events: Mutex<VecDeque<JobStatus>>,
    pub locks: Mutex<VecDeque<bool>>,
    /// Mutating call name whose response is an error envelope.
    pub failing_call: Option<(&'static str, &'static str)>,
    pub next_event: AtomicU64,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            next_event: AtomicU64::new(1000),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }

    fn mutate(&self, name: &'static str, call: String) -> Result<ApiResponse> {
        self.record(call);
        if let Some((failing, message)) = self.failing_call
            && failing == name
        {
            return Ok(ApiResponse::error(message));
        }
        let id = self.next_event.fetch_add(1, Ordering::SeqCst);
        Ok(ApiResponse::ok("event_id", json!(id)))
    }
}

impl CollectionSource for FakeCloud {
    fn list_sizes(&self) -> Result<Vec<Size>> {
        self.record("list_sizes".to_string());
        Ok(self.sizes.clone())
    }
    fn list_regions(&self) -> Result<Vec<Region>> {
        self.record("list_regions".to_string());
        Ok(Vec::new())
    }
    fn list_snapshots(&self) -> Result<Vec<Image>> {
        self.record("list_snapshots".to_string());
        Ok(self.snapshots.clone())
    }
    fn list_droplets(&self) -> Result<Vec<Droplet>> {
        self.record("list_droplets".to_string());
        Ok(Vec::new())
    }
    fn list_ssh_keys(&self) -> Result<Vec<SshKey>> {
        self.record("list_ssh_keys".to_string());
        Ok(Vec::new())
    }
}

impl DropletActions for FakeCloud {
    fn create_droplet(&self, spec: &DropletSpec) -> Result<ApiResponse> {
        self.record(format!("create_droplet({})", spec.name));
        Ok(ApiResponse::ok("droplet", json!({"id": 1, "name": spec.name})))
    }
    fn destroy_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.mutate("destroy", format!("destroy({id})"))
    }
    fn snapshot_droplet(&self, id: u64, name: &str) -> Result<ApiResponse> {
        self.mutate("snapshot", format!("snapshot({id},{name})"))
    }
    fn power_off_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.mutate("power_off", format!("power_off({id})"))
    }
    fn power_on_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.mutate("power_on", format!("power_on({id})"))
    }
    fn reboot_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.mutate("reboot", format!("reboot({id})"))
    }
    fn shutdown_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.mutate("shutdown", format!("shutdown({id})"))
    }
    fn destroy_snapshot(&self, id: u64) -> Result<ApiResponse> {
        self.record(format!("destroy_snapshot({id})"));
        Ok(ApiResponse::ok_empty())
    }
}

impl StatusSource for FakeCloud {
    fn find_droplet(&self, id: u64) -> Result<Droplet> {
        self.record(format!("find_droplet({id})"));
        let locked = self.locks.lock().expect("lock").pop_front().unwrap_or(false);
        Ok(droplet(id, locked))
    }
    fn find_snapshot(&self, id: u64) -> Result<Image> {
        self.record(format!("find_snapshot({id})"));
        Ok(Image {
            id,
            name: "snapshot".to_string(),
            distribution: None,
        })
    }
    fn find_event(&self, id: u64) -> Result<JobStatus> {
        self.record(format!("find_event({id})"));
        let next = self.events.lock().expect("lock").pop_front();
        Ok(next.unwrap_or_else(|| event(id, "done", 100)))
    }
}

/// Reporter that drops every message.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn progress(&self, _: &str, _: u8) {}
}

/// View that remembers which collections were shown.
#[derive(Default)]
pub struct RecordingView {
    pub shown: Mutex<Vec<(CollectionKey, usize)>>,
}

impl CollectionView for RecordingView {
    fn show(&self, key: CollectionKey, records: &[Record]) {
        self.shown.lock().expect("lock").push((key, records.len()));
    }
}

/// Prompter returning one fixed answer.
pub struct FixedAnswer(pub &'static str);

impl Prompter for FixedAnswer {
    fn read_value(&self, _: &str, default: &str) -> Result<String> {
        Ok(if self.0.is_empty() {
            default.to_string()
        } else {
            self.0.to_string()
        })
    }
    fn confirm(&self, _: &str, default: bool) -> Result<bool> {
        Ok(default)
    }
}
