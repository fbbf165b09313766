//! `dosh list <collection>` and the shell's collection listings.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::CloudApi;
use crate::application::services::cache;
use crate::application::services::session::Session;
use crate::domain::{CollectionKey, Record};
use crate::output::{OutputContext, progress};

/// `--force` flag shared by the shell's listing commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct RefreshArgs {
    /// Refetch instead of using the cached list
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `dosh list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// sizes, regions, snapshots or droplets
    pub collection: CollectionKey,
}

/// Run `dosh list <collection>`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the fetch fails.
pub fn run(app: &AppContext, args: &ListArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let client = app.client(&config)?;
    let records = with_spinner(&app.output, args.collection, || {
        cache::fetch(&client, args.collection)
    })?;
    app.renderer()
        .render_collection(args.collection, &records)?;
    Ok(ExitCode::SUCCESS)
}

/// Cached collection for the shell, with a spinner while fetching.
///
/// # Errors
///
/// Returns the fetch error.
pub fn cached<A>(
    session: &mut Session<A>,
    output: &OutputContext,
    key: CollectionKey,
    force: bool,
) -> Result<Arc<[Record]>>
where
    A: CloudApi + Send + Sync + 'static,
{
    with_spinner(output, key, || session.get(key, force))
}

fn with_spinner<T>(
    output: &OutputContext,
    key: CollectionKey,
    fetch: impl FnOnce() -> Result<T>,
) -> Result<T> {
    if !output.show_progress() {
        return fetch();
    }
    let pb = progress::spinner(&format!("Fetching {key}..."));
    let result = fetch();
    match &result {
        Ok(_) => pb.finish_and_clear(),
        Err(_) => progress::finish_error(&pb, &format!("Fetching {key} failed")),
    }
    result
}
