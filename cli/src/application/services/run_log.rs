//! Application service: upload of the per-run log file.

use std::path::PathBuf;

use chrono::Utc;
use rollout_common::run_log_key;

use crate::application::ports::ObjectStore;

/// The log file this process writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLog {
    pub path: PathBuf,
    pub file_name: String,
}

/// Upload the run log under `region`. Failures are logged and dropped.
pub async fn upload(store: &impl ObjectStore, region: &str, log: &RunLog) {
    let key = run_log_key(region, Utc::now(), &log.file_name);
    match store.upload_file(&key, &log.path).await {
        Ok(()) => tracing::info!(uri = %store.uri(&key), "uploaded run log"),
        Err(e) => tracing::error!(%key, error = %format!("{e:#}"), "failed to upload run log"),
    }
}
