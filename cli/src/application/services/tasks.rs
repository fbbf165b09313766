//! Registry of detached background tasks.
//!
//! Commands that start a watcher without waiting on it park the handle here.
//! The shell drains finished handles after every command and awaits the rest
//! before exiting, so no outcome goes unobserved.

use anyhow::Result;
use tracing::warn;

use crate::application::services::watch::{PollOutcome, TaskHandle};

/// Outcome of one background task, as observed by the registry.
#[derive(Debug)]
pub struct TaskReport {
    pub label: String,
    pub result: Result<PollOutcome>,
}

#[derive(Debug, Default)]
pub struct BackgroundTasks {
    running: Vec<TaskHandle>,
}

impl BackgroundTasks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: TaskHandle) {
        self.running.push(handle);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.running.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Labels of the tasks still held, in start order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.running.iter().map(|h| h.label().to_string()).collect()
    }

    /// Collect the outcomes of tasks that have already finished.
    pub async fn reap_finished(&mut self) -> Vec<TaskReport> {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.running)
            .into_iter()
            .partition(TaskHandle::is_finished);
        self.running = running;
        collect(finished).await
    }

    /// Wait for every held task and collect all outcomes.
    pub async fn wait_all(&mut self) -> Vec<TaskReport> {
        collect(std::mem::take(&mut self.running)).await
    }

    /// Stop every held task without waiting for it. Returns their labels.
    pub fn cancel_all(&mut self) -> Vec<String> {
        std::mem::take(&mut self.running)
            .into_iter()
            .map(|handle| {
                handle.cancel();
                handle.label().to_string()
            })
            .collect()
    }
}

async fn collect(handles: Vec<TaskHandle>) -> Vec<TaskReport> {
    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let label = handle.label().to_string();
        let result = handle.wait().await;
        if let Err(e) = &result {
            warn!(task = %label, error = %format!("{e:#}"), "background task failed");
        }
        reports.push(TaskReport { label, result });
    }
    reports
}
