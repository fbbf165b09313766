//! `snapshot ...` — snapshot commands of the interactive shell.

use anyhow::Result;
use clap::Subcommand;

use crate::application::ports::{CloudApi, Prompter};
use crate::application::services::operations;
use crate::commands::droplet::TargetArgs;
use crate::commands::shell::Shell;
use crate::domain::CollectionKey;

#[derive(Subcommand, Debug)]
pub enum SnapshotCommand {
    /// Destroy a snapshot
    Destroy(TargetArgs),
}

/// Run a snapshot subcommand.
///
/// # Errors
///
/// Returns selection and API errors.
pub fn run<A, P>(shell: &mut Shell<'_, A, P>, cmd: SnapshotCommand) -> Result<()>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    match cmd {
        SnapshotCommand::Destroy(t) => destroy(shell, t.id),
    }
}

fn destroy<A, P>(shell: &mut Shell<'_, A, P>, id: Option<u64>) -> Result<()>
where
    A: CloudApi + Send + Sync + 'static,
    P: Prompter,
{
    let id = match id {
        Some(id) => id,
        None => shell
            .session
            .select(CollectionKey::Snapshots, &shell.renderer, &shell.prompter)?,
    };
    if !shell.confirm(&format!("Destroy snapshot {id}?"))? {
        shell.output.info("Cancelled.");
        return Ok(());
    }
    operations::destroy_snapshot(shell.session.api(), id)?;
    shell.output.success(&format!("Snapshot {id} destroyed"));
    Ok(())
}
