//! Application service: single-region listings.

use anyhow::{Context, Result};
use rollout_common::RegionState;

use crate::application::ports::{InventoryService, ObjectStore};
use crate::application::services::state_store;
use crate::domain::reconcile::failed_entries;

/// Recorded entries in `region` whose last run failed.
///
/// # Errors
///
/// Returns an error if the region state cannot be loaded.
pub async fn failed_instances(store: &impl ObjectStore, region: &str) -> Result<RegionState> {
    let state = state_store::load(store, region).await?;
    Ok(failed_entries(&state))
}

/// Instances in `region` that are not checking in to the management service.
///
/// # Errors
///
/// Returns an error if either inventory query fails.
pub async fn unmanaged_instances(
    inventory: &impl InventoryService,
    region: &str,
) -> Result<Vec<String>> {
    let (all, managed) = tokio::try_join!(
        inventory.all_instances(region),
        inventory.managed_instances(region),
    )
    .with_context(|| format!("listing inventory in {region}"))?;
    Ok(all.difference(&managed).cloned().collect())
}
