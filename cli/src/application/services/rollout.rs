//! Application service: locked rollout of the agent to pending instances.
//!
//! Imports only from `crate::domain` and `crate::application`.
//! All I/O is routed through injected port traits.
//!
//! Stages:
//! `Idle → Locked → Reconciled → TargetSelected → AwaitingConfirmation →
//! Executing → Persisted → Unlocked`, with `Aborted` reached when the
//! operator declines. A failed locked step returns the error instead, after
//! logging the last stage reached. Once `Locked` is reached, lock release
//! and run-log upload happen on every exit path.

use anyhow::Result;

use crate::application::ports::{
    CommandService, Confirmer, InventoryService, ObjectStore, ProgressReporter,
};
use crate::application::services::executor::{self, ExecutionSummary, ExecutorOptions};
use crate::application::services::run_log::{self, RunLog};
use crate::application::services::{lock, report};
use crate::domain::target::{TargetSize, select_targets};

/// Position in the rollout state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutStage {
    Idle,
    Locked,
    Reconciled,
    TargetSelected,
    AwaitingConfirmation,
    Executing,
    Persisted,
    Unlocked,
    Aborted,
}

impl RolloutStage {
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Locked => "region lock held",
            Self::Reconciled => "inventory reconciled",
            Self::TargetSelected => "targets selected",
            Self::AwaitingConfirmation => "awaiting confirmation",
            Self::Executing => "command running",
            Self::Persisted => "results persisted",
            Self::Unlocked => "region lock released",
            Self::Aborted => "aborted",
        }
    }
}

/// Inputs for one rollout.
pub struct RolloutRequest<'a> {
    pub region: &'a str,
    pub size: TargetSize,
    pub executor: &'a ExecutorOptions,
    /// Log file to upload during cleanup, if one is being written.
    pub run_log: Option<&'a RunLog>,
}

/// How the rollout ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloutOutcome {
    /// The batch ran and its results were persisted.
    Completed(ExecutionSummary),
    /// Every managed instance already has a recorded run.
    NothingPending,
    /// The operator did not confirm; nothing was dispatched.
    Declined { targets: usize },
}

/// Outcome plus the stages the rollout passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutReport {
    pub outcome: RolloutOutcome,
    pub stages: Vec<RolloutStage>,
}

struct StageTrail(Vec<RolloutStage>);

impl StageTrail {
    fn new() -> Self {
        Self(vec![RolloutStage::Idle])
    }

    fn enter(&mut self, stage: RolloutStage) {
        tracing::debug!(stage = stage.description(), "rollout stage");
        self.0.push(stage);
    }

    fn last(&self) -> RolloutStage {
        self.0.last().copied().unwrap_or(RolloutStage::Idle)
    }
}

/// Roll the agent out to a slice of the region's pending instances.
///
/// # Errors
///
/// Returns `LockError::Held` if another run holds the region lock (nothing
/// else is touched), or the first error raised inside the locked section
/// after cleanup has run.
pub async fn run_rollout(
    inventory: &impl InventoryService,
    commands: &impl CommandService,
    store: &impl ObjectStore,
    confirmer: &impl Confirmer,
    reporter: &impl ProgressReporter,
    req: RolloutRequest<'_>,
) -> Result<RolloutReport> {
    let region = req.region;
    let mut trail = StageTrail::new();

    let token = lock::acquire(store, region).await?;
    trail.enter(RolloutStage::Locked);

    let result = locked_section(inventory, commands, store, confirmer, reporter, &req, &mut trail).await;

    lock::release(store, token).await;
    if let Some(log) = req.run_log {
        run_log::upload(store, region, log).await;
    }

    match result {
        Ok(outcome) => {
            let last = if matches!(outcome, RolloutOutcome::Declined { .. }) {
                RolloutStage::Aborted
            } else {
                RolloutStage::Unlocked
            };
            trail.enter(last);
            Ok(RolloutReport {
                outcome,
                stages: trail.0,
            })
        }
        Err(e) => {
            let reached = trail.last();
            tracing::error!(
                %region,
                stage = reached.description(),
                error = %format!("{e:#}"),
                "rollout aborted"
            );
            Err(e)
        }
    }
}

async fn locked_section(
    inventory: &impl InventoryService,
    commands: &impl CommandService,
    store: &impl ObjectStore,
    confirmer: &impl Confirmer,
    reporter: &impl ProgressReporter,
    req: &RolloutRequest<'_>,
    trail: &mut StageTrail,
) -> Result<RolloutOutcome> {
    let region = req.region;

    let classification = report::reconcile_region(inventory, store, region).await?;
    trail.enter(RolloutStage::Reconciled);

    let targets = select_targets(&classification.pending, req.size);
    trail.enter(RolloutStage::TargetSelected);
    tracing::info!(
        %region,
        pending = classification.pending.len(),
        count = targets.len(),
        "about to run on {} instances in {region}",
        targets.len()
    );

    if targets.is_empty() {
        reporter.warn(&format!("No pending instances in {region}"));
        return Ok(RolloutOutcome::NothingPending);
    }

    trail.enter(RolloutStage::AwaitingConfirmation);
    let prompt = format!(
        "Run on {} of {} pending instances in {region}?",
        targets.len(),
        classification.pending.len()
    );
    if !confirmer.confirm(&prompt)? {
        tracing::info!(%region, "aborted by user");
        return Ok(RolloutOutcome::Declined {
            targets: targets.len(),
        });
    }

    trail.enter(RolloutStage::Executing);
    let summary = executor::dispatch(commands, store, reporter, region, &targets, req.executor).await?;
    trail.enter(RolloutStage::Persisted);
    Ok(RolloutOutcome::Completed(summary))
}
