//! `droplet ...` — droplet commands of the interactive shell.

use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

use crate::application::ports::{CloudApi, Prompter};
use crate::application::services::operations;
use crate::commands::shell::Shell;
use crate::domain::resource::validate_droplet_name;
use crate::domain::{CollectionKey, DropletAction, DropletSpec};

/// Droplet subcommands.
#[derive(Subcommand, Debug)]
pub enum DropletCommand {
    /// Create a droplet from a snapshot
    New,
    /// Destroy a droplet
    Destroy(TargetArgs),
    /// Power a droplet off
    Off(TargetArgs),
    /// Power a droplet on
    On(TargetArgs),
    /// Reboot a droplet
    Reboot(TargetArgs),
    /// Shut a droplet down
    Shutdown(TargetArgs),
    /// Snapshot a droplet
    Snapshot(SnapshotArgs),
    /// Power off, snapshot and destroy a droplet
    Retire(SnapshotArgs),
}

/// Droplet to act on; selected interactively when omitted.
#[derive(Args, Debug, Clone, Copy)]
pub struct TargetArgs {
    /// Droplet id
    pub id: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Droplet id
    pub id: Option<u64>,
    /// Snapshot name
    #[arg(long)]
    pub name: Option<String>,
}

/// Run a droplet subcommand.
///
/// # Errors
///
/// Returns selection, validation and API errors.
pub async fn run<A, P>(shell: &mut Shell<'_, A, P>, cmd: DropletCommand) -> Result<()>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    match cmd {
        DropletCommand::New => create(shell),
        DropletCommand::Destroy(t) => act(shell, DropletAction::Destroy, t.id),
        DropletCommand::Off(t) => act(shell, DropletAction::PowerOff, t.id),
        DropletCommand::On(t) => act(shell, DropletAction::PowerOn, t.id),
        DropletCommand::Reboot(t) => act(shell, DropletAction::Reboot, t.id),
        DropletCommand::Shutdown(t) => act(shell, DropletAction::Shutdown, t.id),
        DropletCommand::Snapshot(args) => snapshot(shell, &args),
        DropletCommand::Retire(args) => retire(shell, &args).await,
    }
}

fn create<A, P>(shell: &mut Shell<'_, A, P>) -> Result<()>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    let name = shell
        .prompter
        .read_value("Droplet name", &shell.config.droplet.default_name)?;
    validate_droplet_name(&name)?;

    let size_id = pick(shell, CollectionKey::Sizes)?;
    let image_id = pick(shell, CollectionKey::Snapshots)?;
    let region_id = pick(shell, CollectionKey::Regions)?;
    let ssh_key_ids = operations::all_ssh_key_ids(shell.session.api())?;

    let spec = DropletSpec {
        name,
        size_id,
        image_id,
        region_id,
        ssh_key_ids,
        private_networking: false,
        backups_enabled: false,
    };
    let created = operations::create(shell.session.api(), &spec)?;
    shell.renderer.render_created(&created);
    if let Some(event_id) = created.event_id {
        shell.watch_in_background(event_id);
    }
    Ok(())
}

fn act<A, P>(shell: &mut Shell<'_, A, P>, action: DropletAction, id: Option<u64>) -> Result<()>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    let id = target(shell, id)?;
    if action == DropletAction::Destroy && !shell.confirm(&format!("Destroy droplet {id}?"))? {
        shell.output.info("Cancelled.");
        return Ok(());
    }
    let event_id = operations::issue(shell.session.api(), action, id)?;
    shell
        .output
        .success(&format!("{} droplet {id} (event {event_id})", capitalize(action.progressive())));
    shell.watch_in_background(event_id);
    Ok(())
}

fn snapshot<A, P>(shell: &mut Shell<'_, A, P>, args: &SnapshotArgs) -> Result<()>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    let id = target(shell, args.id)?;
    let name = snapshot_name(shell, args.name.as_deref())?;
    let event_id = operations::snapshot(shell.session.api(), id, &name)?;
    shell.output.success(&format!(
        "Snapshotting droplet {id} as '{name}' (event {event_id})"
    ));
    shell.watch_in_background(event_id);
    Ok(())
}

async fn retire<A, P>(shell: &mut Shell<'_, A, P>, args: &SnapshotArgs) -> Result<()>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    let id = target(shell, args.id)?;
    let name = snapshot_name(shell, args.name.as_deref())?;
    let prompt = format!(
        "Power off droplet {id}, snapshot it as '{name}' and destroy it?"
    );
    if !shell.confirm(&prompt)? {
        shell.output.info("Cancelled.");
        return Ok(());
    }
    let report = shell.session.run_composite(id, &name).await?;
    shell.renderer.render_workflow(&report);
    Ok(())
}

fn target<A, P>(shell: &mut Shell<'_, A, P>, id: Option<u64>) -> Result<u64>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    match id {
        Some(id) => Ok(id),
        None => pick(shell, CollectionKey::Droplets),
    }
}

fn pick<A, P>(shell: &mut Shell<'_, A, P>, key: CollectionKey) -> Result<u64>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    shell.session.select(key, &shell.renderer, &shell.prompter)
}

fn snapshot_name<A, P>(shell: &Shell<'_, A, P>, given: Option<&str>) -> Result<String>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    if let Some(name) = given {
        return Ok(name.to_string());
    }
    let default = shell
        .config
        .default_snapshot_name(Local::now().date_naive());
    shell.prompter.read_value("Snapshot name", &default)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
