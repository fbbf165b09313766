//! The long-lived component an interactive session talks to.
//!
//! `Session` owns the Collection Cache and the background task registry and
//! exposes the tracking core: `get`, `select`, `watch`,
//! `wait_until_unlocked`, `run_composite`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CloudApi, CollectionView, ProgressReporter, Prompter};
use crate::application::services::cache::CollectionCache;
use crate::application::services::selector;
use crate::application::services::tasks::{BackgroundTasks, TaskReport};
use crate::application::services::watch::{self, TaskHandle};
use crate::application::services::workflow::{self, RetireOptions, WorkflowReport};
use crate::domain::{CollectionKey, Record};

pub struct Session<A> {
    api: Arc<A>,
    reporter: Arc<dyn ProgressReporter>,
    cache: CollectionCache,
    tasks: BackgroundTasks,
    interval: Duration,
}

impl<A> Session<A>
where
    A: CloudApi + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(api: Arc<A>, reporter: Arc<dyn ProgressReporter>, interval: Duration) -> Self {
        Self {
            api,
            reporter,
            cache: CollectionCache::new(),
            tasks: BackgroundTasks::new(),
            interval,
        }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn reporter(&self) -> &dyn ProgressReporter {
        self.reporter.as_ref()
    }

    /// Cached collection for `key`; refetched when `force`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous entry stays cached.
    pub fn get(&mut self, key: CollectionKey, force: bool) -> Result<Arc<[Record]>> {
        self.cache.get(self.api.as_ref(), key, force)
    }

    /// Present `key` and return the id the user picks.
    ///
    /// # Errors
    ///
    /// See [`selector::select`].
    pub fn select(
        &mut self,
        key: CollectionKey,
        view: &impl CollectionView,
        prompter: &impl Prompter,
    ) -> Result<u64> {
        selector::select(&mut self.cache, self.api.as_ref(), view, prompter, key)
    }

    /// Start an Event Watcher for `event_id`.
    #[must_use]
    pub fn watch(&self, event_id: u64) -> TaskHandle {
        watch::watch_event(
            Arc::clone(&self.api),
            Arc::clone(&self.reporter),
            event_id,
            self.interval,
        )
    }

    /// Start a Lock Watcher for droplet `droplet_id`.
    #[must_use]
    pub fn wait_until_unlocked(&self, droplet_id: u64) -> TaskHandle {
        watch::wait_until_unlocked(Arc::clone(&self.api), droplet_id, self.interval)
    }

    /// Start an Event Watcher and park it in the background registry.
    pub fn watch_in_background(&mut self, event_id: u64) {
        let handle = self.watch(event_id);
        self.tasks.push(handle);
    }

    /// Retire droplet `droplet_id`: power off, snapshot, destroy.
    ///
    /// # Errors
    ///
    /// See [`workflow::run_composite`].
    pub async fn run_composite(
        &self,
        droplet_id: u64,
        snapshot_name: &str,
    ) -> Result<WorkflowReport> {
        let opts = RetireOptions {
            snapshot_name,
            interval: self.interval,
        };
        workflow::run_composite(&self.api, &self.reporter, droplet_id, &opts).await
    }

    /// Labels of background tasks still held.
    #[must_use]
    pub fn running_tasks(&self) -> Vec<String> {
        self.tasks.labels()
    }

    /// Outcomes of background tasks that finished since the last call.
    pub async fn reap_finished(&mut self) -> Vec<TaskReport> {
        self.tasks.reap_finished().await
    }

    /// Wait for every background task.
    pub async fn wait_all(&mut self) -> Vec<TaskReport> {
        self.tasks.wait_all().await
    }

    /// Stop every background task, warning about each one stopped.
    pub fn cancel_all(&mut self) -> Vec<String> {
        let labels = self.tasks.cancel_all();
        for label in &labels {
            self.reporter.warn(&format!("{label} abandoned"));
        }
        labels
    }
}
