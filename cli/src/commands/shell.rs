//! `dosh` — the interactive shell.
//!
//! Each input line is split on whitespace and parsed as a [`ShellCommand`].
//! Command errors are printed and the loop continues. Finished background
//! tasks are reported after every command; `exit` waits for the rest.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::app::AppContext;
use crate::application::ports::{CloudApi, Prompter};
use crate::application::services::session::Session;
use crate::application::services::tasks::TaskReport;
use crate::commands::droplet::{self, DropletCommand};
use crate::commands::snapshot::{self, SnapshotCommand};
use crate::commands::{event, list};
use crate::domain::{CollectionKey, ShellConfig};
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

const PROMPT: &str = "dosh>";

/// Exit code when the final wait is interrupted with Ctrl-C.
const INTERRUPTED: u8 = 130;

/// One line of shell input.
#[derive(Parser, Debug)]
#[command(
    name = "dosh",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true,
    override_usage = "<COMMAND> [ARGS]"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// List commands
    Help,
    /// Show sizes
    Sizes(list::RefreshArgs),
    /// Show regions
    Regions(list::RefreshArgs),
    /// Show snapshots
    Snapshots(list::RefreshArgs),
    /// Show droplets
    Droplets(list::RefreshArgs),
    /// Manage droplets
    #[command(subcommand)]
    Droplet(DropletCommand),
    /// Manage snapshots
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
    /// Show the status of an event
    Event {
        /// Event id
        id: u64,
    },
    /// Watch an event in the background
    Watch {
        /// Event id
        id: u64,
    },
    /// List background tasks
    Tasks,
    /// Wait for every background task
    Wait,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Shell state shared by every command handler.
pub struct Shell<'a, A, P> {
    pub(crate) session: Session<A>,
    pub(crate) output: &'a OutputContext,
    pub(crate) renderer: HumanRenderer<'a>,
    pub(crate) prompter: P,
    pub(crate) config: ShellConfig,
    /// Skip confirmations.
    pub(crate) assume_yes: bool,
}

impl<'a, A, P> Shell<'a, A, P>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    #[must_use]
    pub fn new(
        session: Session<A>,
        output: &'a OutputContext,
        prompter: P,
        config: ShellConfig,
        assume_yes: bool,
    ) -> Self {
        Self {
            session,
            output,
            renderer: HumanRenderer::new(output),
            prompter,
            config,
            assume_yes,
        }
    }

    /// Parse and run one input line. Blank lines and parse errors continue
    /// the loop.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn run_line(&mut self, line: &str) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(Flow::Continue);
        }
        match ShellLine::try_parse_from(words) {
            Ok(parsed) => self.execute(parsed.command).await,
            Err(e) => {
                self.renderer.render_help(&e.render().to_string());
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one parsed command.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Help => {
                let help = ShellLine::command().render_help().to_string();
                self.renderer.render_help(&help);
            }
            ShellCommand::Sizes(args) => self.list(CollectionKey::Sizes, args.force)?,
            ShellCommand::Regions(args) => self.list(CollectionKey::Regions, args.force)?,
            ShellCommand::Snapshots(args) => self.list(CollectionKey::Snapshots, args.force)?,
            ShellCommand::Droplets(args) => self.list(CollectionKey::Droplets, args.force)?,
            ShellCommand::Droplet(cmd) => droplet::run(self, cmd).await?,
            ShellCommand::Snapshot(cmd) => snapshot::run(self, cmd)?,
            ShellCommand::Event { id } => {
                let status = event::fetch(self.session.api(), id)?;
                self.renderer.render_event(&status);
            }
            ShellCommand::Watch { id } => self.watch_in_background(id),
            ShellCommand::Tasks => self.renderer.render_tasks(&self.session.running_tasks()),
            ShellCommand::Wait => {
                let reports = self.session.wait_all().await;
                self.report(&reports);
            }
            ShellCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Report background tasks that finished since the last command.
    pub async fn reap(&mut self) -> Vec<TaskReport> {
        let reports = self.session.reap_finished().await;
        self.report(&reports);
        reports
    }

    /// Wait for every background task before leaving. Returns the exit code.
    pub async fn shutdown(&mut self) -> ExitCode {
        let running = self.session.running_tasks().len();
        if running > 0 {
            self.output
                .info(&format!("Waiting for {running} background task(s)..."));
        }
        let reports = tokio::select! {
            reports = self.session.wait_all() => reports,
            _ = tokio::signal::ctrl_c() => {
                self.output.warn("Interrupted");
                self.session.cancel_all();
                return ExitCode::from(INTERRUPTED);
            }
        };
        self.report(&reports);
        if reports.iter().any(|r| r.result.is_err()) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    pub(crate) fn watch_in_background(&mut self, event_id: u64) {
        self.session.watch_in_background(event_id);
        self.output
            .info(&format!("Watching event {event_id} in the background"));
    }

    /// Ask for confirmation unless confirmations are skipped.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        self.prompter.confirm(prompt, false)
    }

    fn list(&mut self, key: CollectionKey, force: bool) -> Result<()> {
        let records = list::cached(&mut self.session, self.output, key, force)?;
        self.renderer.render_collection(key, &records);
        Ok(())
    }

    fn report(&self, reports: &[TaskReport]) {
        for report in reports {
            self.renderer.render_task_report(report);
        }
    }
}

/// Run the interactive shell until `exit` or end of input.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, credentials are
/// missing, or the terminal cannot be read.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.config()?;
    let client = Arc::new(app.client(&config)?);
    let reporter = Arc::new(TerminalReporter::new(&app.output));
    let session = Session::new(client, reporter, config.poll_interval());
    let mut shell = Shell::new(
        session,
        &app.output,
        app.prompter(),
        config,
        app.assume_yes,
    );

    app.output
        .info("Type 'help' for a list of commands, 'exit' to leave.");
    while let Some(line) = shell.prompter.read_command(PROMPT)? {
        let flow = match shell.run_line(&line).await {
            Ok(flow) => flow,
            Err(e) => {
                app.output.error(&format!("{e:#}"));
                Flow::Continue
            }
        };
        shell.reap().await;
        if flow == Flow::Exit {
            break;
        }
    }
    Ok(shell.shutdown().await)
}
