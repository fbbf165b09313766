//! API response envelope and the Response Validator.
//!
//! Every mutating call's result passes through [`validate`] (or
//! [`ensure_ok`] when the call carries no payload), so a provider failure
//! always surfaces as [`ShellError::OperationFailed`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::ShellError;

/// Status value of a successful response.
pub const STATUS_OK: &str = "OK";

/// Raw response envelope: `{"status": ..., "message"?: ..., <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default, alias = "error_message", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl ApiResponse {
    /// Successful response carrying a single payload field.
    #[must_use]
    pub fn ok(field: &str, value: Value) -> Self {
        let mut body = Map::new();
        body.insert(field.to_string(), value);
        Self {
            status: STATUS_OK.to_string(),
            message: None,
            body,
        }
    }

    /// Successful response with no payload.
    #[must_use]
    pub fn ok_empty() -> Self {
        Self {
            status: STATUS_OK.to_string(),
            message: None,
            body: Map::new(),
        }
    }

    /// Failed response carrying the provider's message.
    #[must_use]
    pub fn error(message: &str) -> Self {
        Self {
            status: "ERROR".to_string(),
            message: Some(message.to_string()),
            body: Map::new(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Fail with [`ShellError::OperationFailed`] unless the status is `OK`.
///
/// # Errors
///
/// Returns `OperationFailed` with the provider message on any other status.
pub fn ensure_ok(response: &ApiResponse) -> Result<(), ShellError> {
    if response.is_ok() {
        return Ok(());
    }
    let message = response
        .message
        .clone()
        .unwrap_or_else(|| format!("remote status {}", response.status));
    Err(ShellError::OperationFailed(message))
}

/// Extract `field` from a successful response.
///
/// # Errors
///
/// Returns `OperationFailed` on a non-`OK` status, `MissingField` when the
/// payload lacks `field`, and `MalformedField` when it has the wrong shape.
pub fn validate<T: DeserializeOwned>(response: &ApiResponse, field: &str) -> Result<T, ShellError> {
    ensure_ok(response)?;
    let value = response
        .body
        .get(field)
        .ok_or_else(|| ShellError::MissingField(field.to_string()))?;
    serde_json::from_value(value.clone()).map_err(|e| ShellError::MalformedField {
        field: field.to_string(),
        reason: e.to_string(),
    })
}
