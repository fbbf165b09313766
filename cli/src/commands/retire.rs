//! `dosh retire <droplet-id>` — power off, snapshot and destroy a droplet.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::Prompter;
use crate::application::services::session::Session;
use crate::output::TerminalReporter;

/// Arguments for `dosh retire`.
#[derive(Args, Debug)]
pub struct RetireArgs {
    /// Droplet id
    pub droplet_id: u64,
    /// Name of the snapshot taken before destroy (defaults to today's date)
    #[arg(long)]
    pub snapshot_name: Option<String>,
}

/// Run `dosh retire`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or any step fails.
pub async fn run(app: &AppContext, args: &RetireArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let client = Arc::new(app.client(&config)?);
    let name = args
        .snapshot_name
        .clone()
        .unwrap_or_else(|| config.default_snapshot_name(Local::now().date_naive()));

    let prompt = format!(
        "Power off droplet {}, snapshot it as '{name}' and destroy it?",
        args.droplet_id
    );
    if !app.prompter().confirm(&prompt, false)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let reporter = Arc::new(TerminalReporter::new(&app.output));
    let session = Session::new(client, reporter, config.poll_interval());
    let report = session.run_composite(args.droplet_id, &name).await?;
    app.renderer().render_workflow(&report)?;
    Ok(ExitCode::SUCCESS)
}
