//! Workflow Orchestrator — ordered multi-step droplet workflows.
//!
//! Each step issues one mutating call (or none, for an unlock wait), starts
//! the matching watcher, and waits for it before the next step is issued.
//! The first failing step aborts the rest; completed steps are not undone.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::{CloudApi, ProgressReporter};
use crate::application::services::operations;
use crate::application::services::watch::{TaskHandle, wait_until_unlocked, watch_event};
use crate::domain::{DropletAction, RETIRE_WORKFLOW, WorkflowStep};

pub struct RetireOptions<'a> {
    /// Name given to the snapshot taken before destroy.
    pub snapshot_name: &'a str,
    pub interval: Duration,
}

/// A step that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: WorkflowStep,
    /// Event id of the step's job; `None` for unlock waits.
    pub event_id: Option<u64>,
    pub polls: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub droplet_id: u64,
    pub steps: Vec<StepReport>,
}

/// Power off, snapshot and destroy droplet `droplet_id`.
///
/// # Errors
///
/// Returns the first step's failure: a validation error from a mutating
/// call, a transport error, or a failed watcher.
pub async fn run_composite<A>(
    api: &Arc<A>,
    reporter: &Arc<dyn ProgressReporter>,
    droplet_id: u64,
    opts: &RetireOptions<'_>,
) -> Result<WorkflowReport>
where
    A: CloudApi + Send + Sync + 'static,
{
    run_steps(api, reporter, droplet_id, RETIRE_WORKFLOW, opts).await
}

/// Run `steps` in order against droplet `droplet_id`.
///
/// # Errors
///
/// See [`run_composite`].
pub async fn run_steps<A>(
    api: &Arc<A>,
    reporter: &Arc<dyn ProgressReporter>,
    droplet_id: u64,
    steps: &[WorkflowStep],
    opts: &RetireOptions<'_>,
) -> Result<WorkflowReport>
where
    A: CloudApi + Send + Sync + 'static,
{
    let mut report = WorkflowReport {
        droplet_id,
        steps: Vec::with_capacity(steps.len()),
    };
    for (n, &step) in steps.iter().enumerate() {
        reporter.step(&format!("[{}/{}] {step}...", n + 1, steps.len()));
        info!(droplet_id, step = %step, "workflow step started");

        let (event_id, handle) = start_step(api, reporter, droplet_id, step, opts)
            .with_context(|| format!("step '{step}' failed for droplet {droplet_id}"))?;
        let outcome = handle
            .wait()
            .await
            .with_context(|| format!("step '{step}' did not complete for droplet {droplet_id}"))?;

        info!(droplet_id, step = %step, polls = outcome.polls, "workflow step complete");
        reporter.success(&format!("{step} complete"));
        report.steps.push(StepReport {
            step,
            event_id,
            polls: outcome.polls,
        });
    }
    Ok(report)
}

fn start_step<A>(
    api: &Arc<A>,
    reporter: &Arc<dyn ProgressReporter>,
    droplet_id: u64,
    step: WorkflowStep,
    opts: &RetireOptions<'_>,
) -> Result<(Option<u64>, TaskHandle)>
where
    A: CloudApi + Send + Sync + 'static,
{
    let event_id = match step {
        WorkflowStep::WaitUnlocked => {
            return Ok((
                None,
                wait_until_unlocked(Arc::clone(api), droplet_id, opts.interval),
            ));
        }
        WorkflowStep::PowerOff => {
            operations::issue(api.as_ref(), DropletAction::PowerOff, droplet_id)?
        }
        WorkflowStep::Snapshot => {
            operations::snapshot(api.as_ref(), droplet_id, opts.snapshot_name)?
        }
        WorkflowStep::Destroy => {
            operations::issue(api.as_ref(), DropletAction::Destroy, droplet_id)?
        }
    };
    let handle = watch_event(
        Arc::clone(api),
        Arc::clone(reporter),
        event_id,
        opts.interval,
    );
    Ok((Some(event_id), handle))
}
