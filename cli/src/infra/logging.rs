//! Process-wide tracing subscriber.
//!
//! Events go to stderr and to a per-run file in the temp directory. The file
//! is uploaded to the state bucket once the command finishes.

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::application::services::run_log::RunLog;

/// Name of the per-run log file for a process started now.
#[must_use]
pub fn run_log_file_name() -> String {
    format!("rollout-{}.log", Utc::now().format("%Y%m%d-%H%M%S"))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "rollout_cli=debug,info" } else { "info" }
}

/// Install the global subscriber. Call once, from `main`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a subscriber is
/// already installed.
pub fn init(verbose: bool) -> Result<RunLog> {
    let file_name = run_log_file_name();
    let path = std::env::temp_dir().join(&file_name);
    let file =
        File::create(&path).with_context(|| format!("cannot create {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .context("cannot install tracing subscriber")?;

    Ok(RunLog { path, file_name })
}
