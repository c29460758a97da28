//! Inventory reconciliation: pure set arithmetic over three instance sets.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use std::collections::BTreeSet;

use rollout_common::{InvocationStatus, RegionReport, RegionState};

/// Result of reconciling one region's inventory against its recorded state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// Instances in the region that are not checking in to the management service.
    pub unmanaged: BTreeSet<String>,
    /// Managed instances with no recorded execution.
    pub pending: BTreeSet<String>,
    /// Recorded entries with status `SUCCEEDED`.
    pub succeeded: usize,
    /// Recorded entries with status `FAILED`.
    pub failed: usize,
    /// Every instance in the region.
    pub total: usize,
}

impl Classification {
    #[must_use]
    pub fn uninstalled(&self) -> usize {
        self.failed + self.unmanaged.len() + self.pending.len()
    }

    /// Collapse into the report row for `region`.
    #[must_use]
    pub fn to_report(&self, region: &str) -> RegionReport {
        RegionReport {
            region: region.to_string(),
            total: self.total,
            success: self.succeeded,
            failed: self.failed,
            unmanaged: self.unmanaged.len(),
            pending: self.pending.len(),
            uninstalled: self.uninstalled(),
        }
    }
}

/// Classify a region's instances.
///
/// `unmanaged = all − managed`, `pending = managed − recorded`; succeeded and
/// failed counts come straight from the recorded statuses. Any input may be
/// empty.
#[must_use]
pub fn classify(
    all: &BTreeSet<String>,
    managed: &BTreeSet<String>,
    recorded: &RegionState,
) -> Classification {
    let unmanaged = all.difference(managed).cloned().collect();
    let pending = managed
        .iter()
        .filter(|id| !recorded.contains_key(*id))
        .cloned()
        .collect();
    let succeeded = recorded
        .values()
        .filter(|r| r.status == InvocationStatus::Succeeded)
        .count();
    let failed = recorded
        .values()
        .filter(|r| r.status == InvocationStatus::Failed)
        .count();

    Classification {
        unmanaged,
        pending,
        succeeded,
        failed,
        total: all.len(),
    }
}

/// Entries of `state` whose last run failed.
#[must_use]
pub fn failed_entries(state: &RegionState) -> RegionState {
    state
        .iter()
        .filter(|(_, r)| r.status == InvocationStatus::Failed)
        .map(|(id, r)| (id.clone(), r.clone()))
        .collect()
}
