//! Collection Cache — memoizes collection listings per key.
//!
//! An entry is created on first access and replaced wholesale on a forced
//! refresh. Nothing expires on its own.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::CollectionSource;
use crate::domain::{CollectionKey, Record};

/// Owned mapping from collection key to the last fetched sequence.
///
/// Mutated only by the foreground control flow; pollers never touch it.
#[derive(Debug, Default)]
pub struct CollectionCache {
    entries: HashMap<CollectionKey, Arc<[Record]>>,
}

impl CollectionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached collection, fetching it on a miss or when `force`.
    ///
    /// Repeated calls without `force` return the same `Arc`. A failed fetch
    /// leaves any previous entry in place.
    ///
    /// # Errors
    ///
    /// Returns the fetch collaborator's error unchanged (with context).
    pub fn get(
        &mut self,
        source: &impl CollectionSource,
        key: CollectionKey,
        force: bool,
    ) -> Result<Arc<[Record]>> {
        if !force && let Some(entry) = self.entries.get(&key) {
            debug!(collection = %key, len = entry.len(), "cache hit");
            return Ok(Arc::clone(entry));
        }
        debug!(collection = %key, force, "cache miss, fetching");
        let records: Arc<[Record]> = fetch(source, key)
            .with_context(|| format!("fetching {key}"))?
            .into();
        self.entries.insert(key, Arc::clone(&records));
        Ok(records)
    }

    /// The cached entry for `key`, without fetching.
    #[must_use]
    pub fn peek(&self, key: CollectionKey) -> Option<Arc<[Record]>> {
        self.entries.get(&key).cloned()
    }
}

/// Invoke the remote-fetch collaborator associated with `key`.
///
/// # Errors
///
/// Returns the collaborator's error.
pub fn fetch(source: &impl CollectionSource, key: CollectionKey) -> Result<Vec<Record>> {
    Ok(match key {
        CollectionKey::Sizes => source.list_sizes()?.into_iter().map(Record::Size).collect(),
        CollectionKey::Regions => source
            .list_regions()?
            .into_iter()
            .map(Record::Region)
            .collect(),
        CollectionKey::Snapshots => source
            .list_snapshots()?
            .into_iter()
            .map(Record::Snapshot)
            .collect(),
        CollectionKey::Droplets => source
            .list_droplets()?
            .into_iter()
            .map(Record::Droplet)
            .collect(),
    })
}
