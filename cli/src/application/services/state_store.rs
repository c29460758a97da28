//! Application service: per-region instance state persistence.
//!
//! State is one JSON object per region, replaced whole on every save.
//! There is no merge at the storage layer: callers load, mutate in memory,
//! and save the complete map (last writer wins).

use anyhow::{Context, Result};
use rollout_common::{RegionState, state_key};

use crate::application::ports::ObjectStore;

/// Load the recorded state for `region`. A missing object is an empty map.
///
/// # Errors
///
/// Returns an error if the store read fails or the object is not valid state JSON.
pub async fn load(store: &impl ObjectStore, region: &str) -> Result<RegionState> {
    let key = state_key(region);
    let Some(body) = store
        .get(&key)
        .await
        .with_context(|| format!("reading state {key}"))?
    else {
        tracing::debug!(%key, "no state recorded yet");
        return Ok(RegionState::new());
    };
    serde_json::from_slice(&body).with_context(|| format!("parsing state {key}"))
}

/// Overwrite the recorded state for `region`.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub async fn save(store: &impl ObjectStore, region: &str, state: &RegionState) -> Result<()> {
    let key = state_key(region);
    let body = serde_json::to_vec_pretty(state).context("serializing state")?;
    store
        .put(&key, body)
        .await
        .with_context(|| format!("writing state {key}"))?;
    tracing::info!(%key, entries = state.len(), "saved state");
    Ok(())
}
