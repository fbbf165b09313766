//! Selector — resolve a one-based user choice to an entity id.

use anyhow::Result;

use crate::application::ports::{CollectionSource, CollectionView, Prompter};
use crate::application::services::cache::CollectionCache;
use crate::domain::{CollectionKey, ShellError};

pub const SELECT_PROMPT: &str = "Select from list";

/// Show the cached `key` collection and return the id of the chosen record.
///
/// # Errors
///
/// Returns [`ShellError::EmptyList`] when there is nothing to choose from,
/// [`ShellError::InvalidSelection`] / [`ShellError::IndexOutOfRange`] for bad
/// input, or the cache's fetch error.
pub fn select(
    cache: &mut CollectionCache,
    source: &impl CollectionSource,
    view: &impl CollectionView,
    prompter: &impl Prompter,
    key: CollectionKey,
) -> Result<u64> {
    let records = cache.get(source, key, false)?;
    view.show(key, &records);
    if records.is_empty() {
        return Err(ShellError::EmptyList(key).into());
    }
    let answer = prompter.read_value(SELECT_PROMPT, "1")?;
    let index = parse_index(&answer, records.len())?;
    Ok(records[index].id())
}

/// Convert one-based user input into a zero-based index within `len`.
///
/// # Errors
///
/// Returns `InvalidSelection` for non-numeric input and `IndexOutOfRange`
/// for anything outside `1..=len`.
pub fn parse_index(input: &str, len: usize) -> Result<usize, ShellError> {
    let trimmed = input.trim();
    let number: usize = trimmed
        .parse()
        .map_err(|_| ShellError::InvalidSelection(trimmed.to_string()))?;
    if number == 0 || number > len {
        return Err(ShellError::IndexOutOfRange { index: number, len });
    }
    Ok(number - 1)
}
