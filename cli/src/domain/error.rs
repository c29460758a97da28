//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Usage errors ──────────────────────────────────────────────────────────────

/// Bad or missing arguments. Raised before any remote side effect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Must specify --count or --percent")]
    MissingTargetSize,

    #[error("--count and --percent are mutually exclusive; pass only one")]
    ConflictingTargetSize,

    #[error("Invalid --percent {0}: must be between 1 and 100")]
    InvalidPercent(u32),

    #[error("Invalid --count {0}: must be at least 1")]
    InvalidCount(u32),

    #[error("Invalid region '{region}': {reason}")]
    InvalidRegion { region: String, reason: &'static str },

    #[error("No state bucket configured. Pass --bucket, set ROLLOUT_BUCKET, or add aws.bucket to the config file.")]
    MissingBucket,
}

// ── Lock errors ───────────────────────────────────────────────────────────────

/// Errors related to the per-region execution lock.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LockError {
    #[error(
        "Another rollout holds the lock for {region} ({key}). \
If no rollout is running, delete the lock object and retry."
    )]
    Held { region: String, key: String },
}

// ── Batch errors ──────────────────────────────────────────────────────────────

/// Errors from a remote command batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Command {command_id} did not finish within {waited_secs}s")]
    WaitTimedOut { command_id: String, waited_secs: u64 },

    #[error("Remote execution service returned no command id")]
    NoCommandId,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration file validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: &'static str },
}
