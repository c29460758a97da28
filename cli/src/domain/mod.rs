//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod reconcile;
pub mod target;

pub use config::{RolloutConfig, validate_config};
pub use error::{BatchError, ConfigError, LockError, UsageError};
pub use reconcile::{Classification, classify, failed_entries};
pub use target::{TargetSize, select_targets};
