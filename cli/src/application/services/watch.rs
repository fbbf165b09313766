//! Event Watcher and Lock Watcher — background polling tasks.
//!
//! Each watcher runs on tokio's blocking pool (a preemptible OS thread), owns
//! its own termination check, and hands back a [`TaskHandle`]. Polling is a
//! fixed interval with no iteration cap; a job that never finishes is polled
//! until the handle is cancelled or the process exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::application::ports::{ProgressReporter, StatusSource};
use crate::domain::TaskError;

/// Result of a poller that reached its termination condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub label: String,
    /// Status fetches performed, including the final one.
    pub polls: u32,
}

/// Longest the poller sleeps before looking at its stop flag again.
const STOP_CHECK: Duration = Duration::from_millis(100);

/// Completion handle for a background poller.
///
/// Always resolves to either the poller's outcome or its error; a panic in
/// the poller becomes [`TaskError::Panicked`], a cancelled poller
/// [`TaskError::Cancelled`].
#[derive(Debug)]
pub struct TaskHandle {
    label: String,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Result<PollOutcome>>,
}

impl TaskHandle {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Ask the poller to stop. It exits before its next status fetch.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Block until the poller terminates.
    ///
    /// # Errors
    ///
    /// Returns the poller's error, or a [`TaskError`] if it panicked or was
    /// cancelled.
    pub async fn wait(self) -> Result<PollOutcome> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(TaskError::Panicked { label: self.label }.into()),
            Err(_) => Err(TaskError::Cancelled { label: self.label }.into()),
        }
    }
}

/// Start polling `event_id` until its action status is terminal.
///
/// Each iteration fetches the status, reports its percentage, and stops on
/// `done`; otherwise sleeps `interval`.
pub fn watch_event<S>(
    source: Arc<S>,
    reporter: Arc<dyn ProgressReporter>,
    event_id: u64,
    interval: Duration,
) -> TaskHandle
where
    S: StatusSource + Send + Sync + 'static,
{
    let label = format!("event {event_id}");
    let progress_label = label.clone();
    spawn_poller(label, interval, move |poll| {
        let status = source
            .find_event(event_id)
            .with_context(|| format!("fetching status of event {event_id}"))?;
        debug!(
            event_id,
            poll,
            action_status = status.action_status.as_deref().unwrap_or("-"),
            percentage = status.percentage,
            "event polled"
        );
        reporter.progress(&progress_label, status.percentage);
        Ok(status.is_done())
    })
}

/// Start polling droplet `droplet_id` until its lock flag is clear.
pub fn wait_until_unlocked<S>(source: Arc<S>, droplet_id: u64, interval: Duration) -> TaskHandle
where
    S: StatusSource + Send + Sync + 'static,
{
    spawn_poller(format!("unlock droplet {droplet_id}"), interval, move |poll| {
        let droplet = source
            .find_droplet(droplet_id)
            .with_context(|| format!("fetching droplet {droplet_id}"))?;
        debug!(droplet_id, poll, locked = droplet.locked, "droplet polled");
        Ok(!droplet.locked)
    })
}

/// Run `check` every `interval` until it returns `true`, fails, or the
/// handle is cancelled.
fn spawn_poller<F>(label: String, interval: Duration, mut check: F) -> TaskHandle
where
    F: FnMut(u32) -> Result<bool> + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let task_stop = Arc::clone(&stop);
    let task_label = label.clone();
    let handle = tokio::task::spawn_blocking(move || {
        let mut polls = 0u32;
        loop {
            if task_stop.load(Ordering::Relaxed) {
                info!(task = %task_label, polls, "background task cancelled");
                return Err(TaskError::Cancelled { label: task_label }.into());
            }
            polls += 1;
            if check(polls)? {
                info!(task = %task_label, polls, "background task complete");
                return Ok(PollOutcome {
                    label: task_label,
                    polls,
                });
            }
            sleep_unless_stopped(interval, &task_stop);
        }
    });
    TaskHandle {
        label,
        stop,
        handle,
    }
}

/// Sleep for `interval`, waking early once `stop` is set.
fn sleep_unless_stopped(interval: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + interval;
    loop {
        let now = Instant::now();
        if now >= deadline || stop.load(Ordering::Relaxed) {
            return;
        }
        std::thread::sleep((deadline - now).min(STOP_CHECK));
    }
}
