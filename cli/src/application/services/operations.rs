//! Droplet and snapshot mutations.
//!
//! Every result passes through the Response Validator; callers get either
//! the job id (or created record) or a typed failure.

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::{CollectionSource, DropletActions};
use crate::domain::{
    CreatedDroplet, DropletAction, DropletSpec, ensure_ok, resource::validate_droplet_name,
    validate,
};

/// Field carrying the job id in a mutating call's response.
pub const EVENT_ID_FIELD: &str = "event_id";

/// Issue `action` against droplet `id` and return its event id.
///
/// # Errors
///
/// Returns the transport error or `OperationFailed` from validation.
pub fn issue(api: &impl DropletActions, action: DropletAction, id: u64) -> Result<u64> {
    let response = match action {
        DropletAction::Destroy => api.destroy_droplet(id),
        DropletAction::PowerOff => api.power_off_droplet(id),
        DropletAction::PowerOn => api.power_on_droplet(id),
        DropletAction::Reboot => api.reboot_droplet(id),
        DropletAction::Shutdown => api.shutdown_droplet(id),
    }
    .with_context(|| format!("{} droplet {id}", action.progressive()))?;
    let event_id: u64 = validate(&response, EVENT_ID_FIELD)?;
    info!(droplet_id = id, event_id, action = action.endpoint(), "droplet action accepted");
    Ok(event_id)
}

/// Snapshot droplet `id` as `name` and return the event id.
///
/// # Errors
///
/// Returns the transport error or `OperationFailed` from validation.
pub fn snapshot(api: &impl DropletActions, id: u64, name: &str) -> Result<u64> {
    let response = api
        .snapshot_droplet(id, name)
        .with_context(|| format!("snapshotting droplet {id}"))?;
    let event_id: u64 = validate(&response, EVENT_ID_FIELD)?;
    info!(droplet_id = id, event_id, snapshot = name, "snapshot accepted");
    Ok(event_id)
}

/// Destroy snapshot `id`. The API answers without a job handle.
///
/// # Errors
///
/// Returns the transport error or `OperationFailed` from validation.
pub fn destroy_snapshot(api: &impl DropletActions, id: u64) -> Result<()> {
    let response = api
        .destroy_snapshot(id)
        .with_context(|| format!("destroying snapshot {id}"))?;
    ensure_ok(&response)?;
    info!(snapshot_id = id, "snapshot destroyed");
    Ok(())
}

/// Create a droplet from `spec`.
///
/// # Errors
///
/// Returns `InvalidName` before any call, the transport error, or
/// `OperationFailed` from validation.
pub fn create(api: &impl DropletActions, spec: &DropletSpec) -> Result<CreatedDroplet> {
    validate_droplet_name(&spec.name)?;
    let response = api
        .create_droplet(spec)
        .with_context(|| format!("creating droplet {}", spec.name))?;
    let created: CreatedDroplet = validate(&response, "droplet")?;
    info!(droplet_id = created.id, name = %created.name, "droplet created");
    Ok(created)
}

/// Ids of every SSH key on the account, for droplet creation.
///
/// # Errors
///
/// Returns the listing error.
pub fn all_ssh_key_ids(api: &impl CollectionSource) -> Result<Vec<u64>> {
    Ok(api
        .list_ssh_keys()
        .context("listing SSH keys")?
        .into_iter()
        .map(|k| k.id)
        .collect())
}
