//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: AWS SDK adapters, config
//! file access, and tracing setup.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod aws;
pub mod config;
pub mod inventory;
pub mod logging;
pub mod s3;
pub mod ssm;
