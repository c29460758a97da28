//! Application service: per-region execution lock.
//!
//! The lock is an object whose existence means "a rollout is running in this
//! region". Acquire checks for it and then creates it with a conditional put,
//! so two racing acquires cannot both win on stores that honour conditional
//! writes. On stores that ignore the condition the check-then-create gap
//! remains; treat the lock as a safety net there, not a guarantee.
//!
//! A process killed while holding the lock leaves the object behind; it must
//! be deleted by hand.

use anyhow::{Context, Result};
use rollout_common::{LOCK_BODY, lock_key};

use crate::application::ports::ObjectStore;
use crate::domain::error::LockError;

/// Proof of a held region lock. Consumed by [`release`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a held lock must be released"]
pub struct LockToken {
    region: String,
    key: String,
}

impl LockToken {
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Acquire the execution lock for `region`.
///
/// # Errors
///
/// Returns `LockError::Held` if the lock object already exists (no waiting,
/// no retry), or a store error if the check or the write fails.
pub async fn acquire(store: &impl ObjectStore, region: &str) -> Result<LockToken> {
    let key = lock_key(region);
    let held = || LockError::Held {
        region: region.to_string(),
        key: key.clone(),
    };

    if store
        .exists(&key)
        .await
        .with_context(|| format!("checking lock {key}"))?
    {
        tracing::error!(%key, "lock exists, aborting");
        return Err(held().into());
    }

    let created = store
        .put_if_absent(&key, LOCK_BODY.to_vec())
        .await
        .with_context(|| format!("creating lock {key}"))?;
    if !created {
        tracing::error!(%key, "lock created concurrently by another run, aborting");
        return Err(held().into());
    }

    tracing::info!(%key, "acquired lock");
    Ok(LockToken {
        region: region.to_string(),
        key,
    })
}

/// Release a held lock. Never fails: deletion errors are logged and dropped
/// so the remaining cleanup steps still run.
pub async fn release(store: &impl ObjectStore, token: LockToken) {
    match store.delete(&token.key).await {
        Ok(()) => tracing::info!(key = %token.key, "released lock"),
        Err(e) => tracing::error!(key = %token.key, error = %format!("{e:#}"), "error releasing lock"),
    }
}
