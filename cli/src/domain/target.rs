//! Target-size math for a rollout batch.
//!
//! Pure functions only, no I/O, no async.

use std::collections::BTreeSet;

use crate::domain::error::UsageError;

/// How many pending instances a rollout should touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSize {
    /// At most this many instances.
    Count(u32),
    /// This percentage of the pending set, never less than one instance.
    Percent(u32),
}

impl TargetSize {
    /// Build from the two optional CLI arguments; exactly one must be given.
    ///
    /// # Errors
    ///
    /// Returns a `UsageError` if neither or both are set, or the value is out of range.
    pub fn from_args(count: Option<u32>, percent: Option<u32>) -> Result<Self, UsageError> {
        match (count, percent) {
            (None, None) => Err(UsageError::MissingTargetSize),
            (Some(_), Some(_)) => Err(UsageError::ConflictingTargetSize),
            (Some(0), None) => Err(UsageError::InvalidCount(0)),
            (Some(n), None) => Ok(Self::Count(n)),
            (None, Some(p)) if p == 0 || p > 100 => Err(UsageError::InvalidPercent(p)),
            (None, Some(p)) => Ok(Self::Percent(p)),
        }
    }

    /// Number of instances to target out of `pending`.
    ///
    /// Percent mode is `max(1, floor(pending * percent / 100))`; count mode is
    /// `min(count, pending)`. An empty pending set always yields zero.
    #[must_use]
    pub fn resolve(self, pending: usize) -> usize {
        if pending == 0 {
            return 0;
        }
        match self {
            Self::Count(n) => (n as usize).min(pending),
            Self::Percent(p) => (pending * p as usize / 100).clamp(1, pending),
        }
    }
}

/// Pick the concrete batch from the pending set.
///
/// Selection order follows the set's iteration order; callers must not rely
/// on which instances are chosen across runs.
#[must_use]
pub fn select_targets(pending: &BTreeSet<String>, size: TargetSize) -> Vec<String> {
    pending
        .iter()
        .take(size.resolve(pending.len()))
        .cloned()
        .collect()
}
