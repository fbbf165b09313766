//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::resource::CollectionKey;

// ── Shell errors ──────────────────────────────────────────────────────────────

/// Errors raised by the operation-tracking core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    /// The remote API answered with a non-`OK` status.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("No {0} to select from. Refresh with '{0} --force'.")]
    EmptyList(CollectionKey),

    /// One-based `index` was outside `1..=len`.
    #[error("Selection {index} is out of range (1-{len}).")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid selection '{0}': expected a number.")]
    InvalidSelection(String),

    #[error("Invalid droplet name '{0}': use letters, digits, '.' and '-' only.")]
    InvalidName(String),

    #[error("Response is missing the '{0}' field.")]
    MissingField(String),

    #[error("Response field '{field}' is malformed: {reason}")]
    MalformedField { field: String, reason: String },
}

// ── Background task errors ────────────────────────────────────────────────────

/// Errors surfaced through a background task's completion handle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Background task '{label}' panicked.")]
    Panicked { label: String },

    #[error("Background task '{label}' was cancelled.")]
    Cancelled { label: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error(
        "API credentials are not configured.\n\nSet DIGITALOCEAN_CLIENT_ID and DIGITALOCEAN_API_KEY, \
         or run: dosh config set api.client_id <id>"
    )]
    MissingCredentials,
}
