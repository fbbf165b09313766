//! JSON output helpers.
//!
//! `JsonRenderer` writes pretty-printed JSON to stdout for every `--json`
//! code path; `format_error` builds the error object printed when a command
//! fails.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::workflow::WorkflowReport;
use crate::domain::{CollectionKey, ConfigError, ShellConfig, ShellError, TaskError};
use crate::output::human::mask_secret;

/// Machine-readable renderer.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print `value` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn print<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", to_pretty(value)?);
        Ok(())
    }
}

/// Serialize `value` as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// `{"collection": "...", "items": [...]}`.
#[must_use]
pub fn collection_value<T: Serialize>(key: CollectionKey, items: &[T]) -> Value {
    json!({
        "collection": key,
        "items": items,
    })
}

#[must_use]
pub fn workflow_value(report: &WorkflowReport) -> Value {
    let steps: Vec<Value> = report
        .steps
        .iter()
        .map(|s| {
            json!({
                "step": s.step.to_string(),
                "event_id": s.event_id,
                "polls": s.polls,
            })
        })
        .collect();
    json!({
        "droplet_id": report.droplet_id,
        "steps": steps,
    })
}

/// Configuration with the API key masked.
#[must_use]
pub fn masked_config(config: &ShellConfig) -> ShellConfig {
    let mut masked = config.clone();
    masked.api.api_key = mask_secret(&masked.api.api_key);
    masked
}

/// Machine-readable code for the error object, from the typed error in
/// `err`'s chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ShellError>() {
            return match e {
                ShellError::OperationFailed(_) => "operation_failed",
                ShellError::EmptyList(_) => "empty_list",
                ShellError::IndexOutOfRange { .. } | ShellError::InvalidSelection(_) => {
                    "invalid_selection"
                }
                ShellError::InvalidName(_) => "invalid_name",
                ShellError::MissingField(_) | ShellError::MalformedField { .. } => {
                    "malformed_response"
                }
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return "config_error";
        }
        if cause.downcast_ref::<TaskError>().is_some() {
            return "task_error";
        }
    }
    "error"
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    to_pretty(&obj)
}
