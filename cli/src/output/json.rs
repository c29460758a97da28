//! JSON output helpers for `--json` mode.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::error::{BatchError, LockError, UsageError};

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Format a JSON error object for a failed command.
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
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    to_pretty(&obj)
}

/// Stable machine-readable code for a command failure.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<LockError>().is_some() {
        "lock_held"
    } else if err.downcast_ref::<UsageError>().is_some() {
        "usage"
    } else if err.downcast_ref::<BatchError>().is_some() {
        "batch"
    } else {
        "error"
    }
}
