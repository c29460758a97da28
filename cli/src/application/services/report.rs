//! Application service: cross-region deployment report.
//!
//! Probes every enabled region concurrently. Each probe is read-only, so the
//! only ordering concern is the output, which follows region enumeration
//! order rather than completion order. A failure in any region fails the
//! whole report.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use rollout_common::{RegionReport, report_snapshot_key};

use crate::application::ports::{InventoryService, ObjectStore};
use crate::application::services::state_store;
use crate::domain::reconcile::{Classification, classify};

/// Reconcile one region from freshly fetched inventory and state.
///
/// # Errors
///
/// Returns an error if any of the three inputs cannot be fetched.
pub async fn reconcile_region(
    inventory: &impl InventoryService,
    store: &impl ObjectStore,
    region: &str,
) -> Result<Classification> {
    let (all, managed, recorded) = tokio::try_join!(
        async {
            inventory
                .all_instances(region)
                .await
                .with_context(|| format!("listing instances in {region}"))
        },
        async {
            inventory
                .managed_instances(region)
                .await
                .with_context(|| format!("listing managed instances in {region}"))
        },
        state_store::load(store, region),
    )?;
    Ok(classify(&all, &managed, &recorded))
}

/// Build one report row per enabled region that has at least one instance.
///
/// # Errors
///
/// Returns an error if region enumeration or any region's reconciliation fails.
pub async fn collect_region_reports(
    inventory: &impl InventoryService,
    store: &impl ObjectStore,
) -> Result<Vec<RegionReport>> {
    let regions = inventory
        .enabled_regions()
        .await
        .context("listing enabled regions")?;
    tracing::info!(count = regions.len(), "probing regions");

    let rows = try_join_all(
        regions
            .iter()
            .map(|region| region_report(inventory, store, region)),
    )
    .await?;
    Ok(rows.into_iter().flatten().collect())
}

async fn region_report(
    inventory: &impl InventoryService,
    store: &impl ObjectStore,
    region: &str,
) -> Result<Option<RegionReport>> {
    let all = inventory
        .all_instances(region)
        .await
        .with_context(|| format!("probing {region}"))?;
    if all.is_empty() {
        tracing::debug!(%region, "no instances, skipping");
        return Ok(None);
    }
    let (managed, recorded) = tokio::try_join!(
        async {
            inventory
                .managed_instances(region)
                .await
                .with_context(|| format!("listing managed instances in {region}"))
        },
        state_store::load(store, region),
    )?;
    let report = classify(&all, &managed, &recorded).to_report(region);
    tracing::debug!(%region, total = report.total, pending = report.pending, "region reconciled");
    Ok(Some(report))
}

/// Persist `reports` as one timestamped snapshot and return its key.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub async fn persist_snapshot(
    store: &impl ObjectStore,
    reports: &[RegionReport],
    at: DateTime<Utc>,
) -> Result<String> {
    let key = report_snapshot_key(at);
    let body = serde_json::to_vec_pretty(reports).context("serializing report")?;
    store
        .put(&key, body)
        .await
        .with_context(|| format!("writing report snapshot {key}"))?;
    tracing::info!(uri = %store.uri(&key), "report for all regions saved");
    Ok(key)
}
