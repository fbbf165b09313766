//! Shared test helpers for service tests.
//!
//! `StubApi` records every call in order and answers from scripted queues.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use serde_json::json;

use crate::application::ports::{
    CollectionSource, DropletActions, ProgressReporter, Prompter, StatusSource,
};
use crate::domain::{
    ApiResponse, Droplet, DropletSpec, DropletStatus, Image, JobStatus, Region, Size, SshKey,
};

pub fn size(id: u64, name: &str) -> Size {
    Size {
        id,
        name: name.to_string(),
    }
}

pub fn region(id: u64, name: &str) -> Region {
    Region {
        id,
        name: name.to_string(),
    }
}

pub fn image(id: u64, name: &str) -> Image {
    Image {
        id,
        name: name.to_string(),
        distribution: None,
    }
}

pub fn droplet(id: u64, locked: bool) -> Droplet {
    Droplet {
        id,
        name: format!("droplet-{id}"),
        ip_address: Some("10.0.0.1".to_string()),
        status: DropletStatus::Active,
        locked,
        created_at: None,
        size_id: 66,
        region_id: 1,
        image_id: None,
    }
}

pub fn job(id: u64, action_status: Option<&str>, percentage: u8) -> JobStatus {
    JobStatus {
        id,
        action_status: action_status.map(str::to_string),
        percentage,
        droplet_id: None,
        event_type_id: None,
    }
}

/// Scripted, recording implementation of the remote API ports.
pub struct StubApi {
    calls: Mutex<Vec<String>>,
    sizes: Vec<Size>,
    regions: Vec<Region>,
    snapshots: Vec<Image>,
    droplets: Vec<Droplet>,
    ssh_keys: Vec<SshKey>,
    listing_error: Mutex<Option<String>>,
    lookup_error: Mutex<Option<String>>,
    droplet_lookup_error: Mutex<Option<String>>,
    events: Mutex<VecDeque<JobStatus>>,
    locks: Mutex<VecDeque<bool>>,
    responses: Mutex<HashMap<&'static str, ApiResponse>>,
    next_event: AtomicU64,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sizes: Vec::new(),
            regions: Vec::new(),
            snapshots: Vec::new(),
            droplets: Vec::new(),
            ssh_keys: Vec::new(),
            listing_error: Mutex::new(None),
            lookup_error: Mutex::new(None),
            droplet_lookup_error: Mutex::new(None),
            events: Mutex::new(VecDeque::new()),
            locks: Mutex::new(VecDeque::new()),
            responses: Mutex::new(HashMap::new()),
            next_event: AtomicU64::new(100),
        }
    }

    pub fn with_sizes(mut self, sizes: Vec<Size>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_snapshots(mut self, snapshots: Vec<Image>) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn with_droplets(mut self, droplets: Vec<Droplet>) -> Self {
        self.droplets = droplets;
        self
    }

    pub fn with_ssh_keys(mut self, ids: &[u64]) -> Self {
        self.ssh_keys = ids
            .iter()
            .map(|&id| SshKey {
                id,
                name: format!("key-{id}"),
            })
            .collect();
        self
    }

    /// Statuses returned by successive `find_event` calls; `done` once drained.
    pub fn with_events(self, events: Vec<JobStatus>) -> Self {
        *self.events.lock().expect("lock") = events.into();
        self
    }

    /// Lock flags returned by successive `find_droplet` calls; unlocked once drained.
    pub fn with_locks(self, locks: Vec<bool>) -> Self {
        *self.locks.lock().expect("lock") = locks.into();
        self
    }

    /// Answer the named mutating call with `response` instead of a fresh event id.
    pub fn respond(self, call: &'static str, response: ApiResponse) -> Self {
        self.responses.lock().expect("lock").insert(call, response);
        self
    }

    pub fn fail_listings(&self, message: &str) {
        *self.listing_error.lock().expect("lock") = Some(message.to_string());
    }

    /// Make every `find_*` call fail with `message`.
    pub fn fail_lookups(&self, message: &str) {
        *self.lookup_error.lock().expect("lock") = Some(message.to_string());
    }

    /// Make only `find_droplet` calls fail with `message`.
    pub fn fail_droplet_lookups(&self, message: &str) {
        *self.droplet_lookup_error.lock().expect("lock") = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Recorded calls, excluding the pollers' lookups.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("find_") && !c.starts_with("list_"))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }

    fn listing<T: Clone>(&self, name: &str, items: &[T]) -> Result<Vec<T>> {
        self.record(name.to_string());
        if let Some(message) = self.listing_error.lock().expect("lock").clone() {
            anyhow::bail!(message);
        }
        Ok(items.to_vec())
    }

    fn lookup(&self, call: String) -> Result<()> {
        self.record(call);
        if let Some(message) = self.lookup_error.lock().expect("lock").clone() {
            anyhow::bail!(message);
        }
        Ok(())
    }

    fn mutation(&self, name: &'static str, call: String) -> ApiResponse {
        self.record(call);
        if let Some(resp) = self.responses.lock().expect("lock").get(name) {
            return resp.clone();
        }
        let event_id = self.next_event.fetch_add(1, Ordering::SeqCst);
        ApiResponse::ok("event_id", json!(event_id))
    }
}

impl CollectionSource for StubApi {
    fn list_sizes(&self) -> Result<Vec<Size>> {
        self.listing("list_sizes", &self.sizes)
    }
    fn list_regions(&self) -> Result<Vec<Region>> {
        self.listing("list_regions", &self.regions)
    }
    fn list_snapshots(&self) -> Result<Vec<Image>> {
        self.listing("list_snapshots", &self.snapshots)
    }
    fn list_droplets(&self) -> Result<Vec<Droplet>> {
        self.listing("list_droplets", &self.droplets)
    }
    fn list_ssh_keys(&self) -> Result<Vec<SshKey>> {
        self.listing("list_ssh_keys", &self.ssh_keys)
    }
}

impl DropletActions for StubApi {
    fn create_droplet(&self, spec: &DropletSpec) -> Result<ApiResponse> {
        self.record(format!(
            "create_droplet({},{},{},{},[{}])",
            spec.name,
            spec.size_id,
            spec.image_id,
            spec.region_id,
            spec.joined_ssh_key_ids()
        ));
        if let Some(resp) = self.responses.lock().expect("lock").get("create_droplet") {
            return Ok(resp.clone());
        }
        Ok(ApiResponse::ok(
            "droplet",
            json!({"id": 500, "name": spec.name, "image_id": spec.image_id,
                   "size_id": spec.size_id, "event_id": 900}),
        ))
    }
    fn destroy_droplet(&self, id: u64) -> Result<ApiResponse> {
        Ok(self.mutation("destroy_droplet", format!("destroy_droplet({id})")))
    }
    fn snapshot_droplet(&self, id: u64, name: &str) -> Result<ApiResponse> {
        Ok(self.mutation("snapshot_droplet", format!("snapshot_droplet({id},{name})")))
    }
    fn power_off_droplet(&self, id: u64) -> Result<ApiResponse> {
        Ok(self.mutation("power_off_droplet", format!("power_off_droplet({id})")))
    }
    fn power_on_droplet(&self, id: u64) -> Result<ApiResponse> {
        Ok(self.mutation("power_on_droplet", format!("power_on_droplet({id})")))
    }
    fn reboot_droplet(&self, id: u64) -> Result<ApiResponse> {
        Ok(self.mutation("reboot_droplet", format!("reboot_droplet({id})")))
    }
    fn shutdown_droplet(&self, id: u64) -> Result<ApiResponse> {
        Ok(self.mutation("shutdown_droplet", format!("shutdown_droplet({id})")))
    }
    fn destroy_snapshot(&self, id: u64) -> Result<ApiResponse> {
        self.record(format!("destroy_snapshot({id})"));
        Ok(self
            .responses
            .lock()
            .expect("lock")
            .get("destroy_snapshot")
            .cloned()
            .unwrap_or_else(ApiResponse::ok_empty))
    }
}

impl StatusSource for StubApi {
    fn find_droplet(&self, id: u64) -> Result<Droplet> {
        self.lookup(format!("find_droplet({id})"))?;
        if let Some(message) = self.droplet_lookup_error.lock().expect("lock").clone() {
            anyhow::bail!(message);
        }
        let locked = self.locks.lock().expect("lock").pop_front().unwrap_or(false);
        Ok(droplet(id, locked))
    }
    fn find_snapshot(&self, id: u64) -> Result<Image> {
        self.lookup(format!("find_snapshot({id})"))?;
        Ok(image(id, "snap"))
    }
    fn find_event(&self, id: u64) -> Result<JobStatus> {
        self.lookup(format!("find_event({id})"))?;
        let next = self.events.lock().expect("lock").pop_front();
        Ok(next.map_or_else(
            || job(id, Some("done"), 100),
            |mut status| {
                status.id = id;
                status
            },
        ))
    }
}

/// Reporter that keeps every message for inspection.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("lock").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.lock().expect("lock").push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.messages.lock().expect("lock").push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.messages.lock().expect("lock").push(format!("warn: {message}"));
    }
    fn progress(&self, label: &str, percentage: u8) {
        self.messages
            .lock()
            .expect("lock")
            .push(format!("progress: {label} {percentage}%"));
    }
}

/// Prompter answering from a queue; empty answers mean "take the default".
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| (*a).to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn read_value(&self, prompt: &str, default: &str) -> Result<String> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        let answer = self.answers.lock().expect("lock").pop_front().unwrap_or_default();
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        let answer = self.answers.lock().expect("lock").pop_front().unwrap_or_default();
        Ok(match answer.as_str() {
            "" => default,
            a => a.eq_ignore_ascii_case("y"),
        })
    }
}
