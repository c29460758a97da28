//! Shared types for the rollout CLI: persisted state records, report rows,
//! and the object-key layout of the state bucket.

pub mod object_keys;
pub mod types;

pub use object_keys::{
    LOCK_BODY, OutputStream, command_output_key, command_output_prefix, lock_key, prefixes,
    report_snapshot_key, run_log_key, state_key, validate_region,
};
pub use types::*;
