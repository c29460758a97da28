//! Application service: bulk remote-command execution.
//!
//! Dispatches one batch covering every target, waits for it to reach a
//! terminal state, then harvests each instance's outcome into the region
//! state. Instances with no retrievable outcome are skipped, not recorded
//! as failed. State is saved once, after harvesting.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use rollout_common::{
    InstanceRecord, InvocationStatus, OutputStream, command_output_key, command_output_prefix,
};
use tokio::time::Instant;

use crate::application::ports::{
    BatchState, CommandRequest, CommandService, ObjectStore, ProgressReporter,
};
use crate::application::services::state_store;
use crate::domain::config::RolloutConfig;
use crate::domain::error::BatchError;

/// Everything the executor needs besides the target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Bucket the execution service uploads output into.
    pub output_bucket: String,
    pub document_name: String,
    pub comment: String,
    pub playbook_url: String,
    /// Path segment between the instance id and `stdout`/`stderr`.
    pub output_plugin_dir: String,
    /// Upper bound on waiting for the batch; exceeding it is fatal.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl ExecutorOptions {
    #[must_use]
    pub fn from_config(config: &RolloutConfig, bucket: &str) -> Self {
        Self {
            output_bucket: bucket.to_string(),
            document_name: config.command.document_name.clone(),
            comment: config.command.comment.clone(),
            playbook_url: config.command.playbook_url_for(bucket),
            output_plugin_dir: config.command.output_plugin_dir.clone(),
            wait_timeout: config.wait.timeout(),
            poll_interval: config.wait.poll_interval(),
        }
    }
}

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionSummary {
    /// Batch id; `None` when there was nothing to dispatch.
    pub command_id: Option<String>,
    /// Terminal state the batch ended in.
    pub batch_state: Option<BatchState>,
    /// Number of instances included in the batch.
    pub dispatched: usize,
    /// Number of instances whose outcome was written to state.
    pub recorded: usize,
    /// Instances with no retrievable outcome, left unrecorded.
    pub skipped: Vec<String>,
}

/// Run the configured command on `targets` and record the outcomes.
///
/// # Errors
///
/// Returns an error if dispatch fails, the batch does not finish within
/// `opts.wait_timeout`, a result lookup fails, or state cannot be
/// loaded or saved.
pub async fn dispatch(
    commands: &impl CommandService,
    store: &impl ObjectStore,
    reporter: &impl ProgressReporter,
    region: &str,
    targets: &[String],
    opts: &ExecutorOptions,
) -> Result<ExecutionSummary> {
    if targets.is_empty() {
        tracing::info!(%region, "no instances to run on");
        return Ok(ExecutionSummary::default());
    }

    let request = CommandRequest {
        instance_ids: targets.to_vec(),
        document_name: opts.document_name.clone(),
        comment: opts.comment.clone(),
        output_bucket: opts.output_bucket.clone(),
        output_prefix: command_output_prefix(region),
        playbook_url: opts.playbook_url.clone(),
    };
    let command_id = commands
        .send_command(region, &request)
        .await
        .with_context(|| format!("sending command to {} instances in {region}", targets.len()))?;
    tracing::info!(%region, %command_id, count = targets.len(), "command started");
    reporter.step(&format!(
        "Waiting for command {command_id} on {} instances...",
        targets.len()
    ));

    let batch_state = wait_for_batch(commands, region, &command_id, opts).await?;
    tracing::info!(%region, %command_id, state = ?batch_state, "command finished");

    let mut state = state_store::load(store, region).await?;
    let mut summary = ExecutionSummary {
        command_id: Some(command_id.clone()),
        batch_state: Some(batch_state),
        dispatched: targets.len(),
        ..ExecutionSummary::default()
    };

    for instance_id in targets {
        let status = commands
            .invocation_status(region, &command_id, instance_id)
            .await
            .with_context(|| format!("fetching result for {instance_id}"))?;
        let Some(raw) = status else {
            tracing::warn!(%region, %command_id, %instance_id, "no invocation result, leaving unrecorded");
            summary.skipped.push(instance_id.clone());
            continue;
        };
        let record = build_record(store, region, &command_id, instance_id, &raw, opts);
        tracing::debug!(%instance_id, status = %record.status, "recorded outcome");
        state.insert(instance_id.clone(), record);
        summary.recorded += 1;
    }

    state_store::save(store, region, &state).await?;

    if summary.skipped.is_empty() {
        reporter.success(&format!("Recorded {} results", summary.recorded));
    } else {
        reporter.warn(&format!(
            "Recorded {} results; {} instances returned no result",
            summary.recorded,
            summary.skipped.len()
        ));
    }
    Ok(summary)
}

/// Poll the batch until it reaches a terminal state.
///
/// # Errors
///
/// Returns `BatchError::WaitTimedOut` once `opts.wait_timeout` elapses, or
/// the underlying error if a status lookup fails.
pub async fn wait_for_batch(
    commands: &impl CommandService,
    region: &str,
    command_id: &str,
    opts: &ExecutorOptions,
) -> Result<BatchState> {
    let started = Instant::now();
    loop {
        let state = commands
            .batch_status(region, command_id)
            .await
            .with_context(|| format!("polling command {command_id}"))?;
        if state.is_terminal() {
            return Ok(state);
        }
        if started.elapsed() >= opts.wait_timeout {
            return Err(BatchError::WaitTimedOut {
                command_id: command_id.to_string(),
                waited_secs: opts.wait_timeout.as_secs(),
            }
            .into());
        }
        tracing::debug!(%command_id, state = ?state, "command still running");
        tokio::time::sleep(opts.poll_interval).await;
    }
}

fn build_record(
    store: &impl ObjectStore,
    region: &str,
    command_id: &str,
    instance_id: &str,
    raw_status: &str,
    opts: &ExecutorOptions,
) -> InstanceRecord {
    let log = |stream| {
        store.uri(&command_output_key(
            region,
            command_id,
            instance_id,
            &opts.output_plugin_dir,
            stream,
        ))
    };
    InstanceRecord {
        status: InvocationStatus::parse(raw_status),
        command_id: command_id.to_string(),
        last_run: Utc::now(),
        stdout_log: log(OutputStream::Stdout),
        stderr_log: log(OutputStream::Stderr),
    }
}
