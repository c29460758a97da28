//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod executor;
pub mod listing;
pub mod lock;
pub mod report;
pub mod rollout;
pub mod run_log;
pub mod state_store;
