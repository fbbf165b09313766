//! `dosh event <id>` — fetch one event status.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::StatusSource;
use crate::domain::JobStatus;

/// Arguments for `dosh event`.
#[derive(Args, Debug)]
pub struct EventArgs {
    /// Event id
    pub id: u64,
}

/// Run `dosh event <id>`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the lookup fails.
pub fn run(app: &AppContext, args: &EventArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let client = app.client(&config)?;
    let status = fetch(&client, args.id)?;
    app.renderer().render_event(&status)?;
    Ok(ExitCode::SUCCESS)
}

/// One status fetch of event `id`.
///
/// # Errors
///
/// Returns the lookup error.
pub fn fetch(source: &impl StatusSource, id: u64) -> Result<JobStatus> {
    source
        .find_event(id)
        .with_context(|| format!("fetching status of event {id}"))
}
