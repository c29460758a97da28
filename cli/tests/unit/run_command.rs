//! Unit tests for the `run` command handler.

#![allow(clippy::expect_used)]

use std::time::Duration;

use rollout_cli::app::{AppContext, OutputMode};
use rollout_cli::application::services::executor::{ExecutionSummary, ExecutorOptions};
use rollout_cli::application::services::rollout::{
    RolloutOutcome, RolloutReport, RolloutStage,
};
use rollout_cli::commands::run;
use rollout_cli::domain::config::RolloutConfig;
use rollout_cli::domain::target::TargetSize;
use rollout_cli::output::OutputContext;

use crate::mocks::{BUCKET, FakeInventory, MemoryObjectStore, ScriptedCommands, run_log_file};

const REGION: &str = "eu-central-1";

fn context(mode: OutputMode) -> AppContext {
    AppContext {
        output: OutputContext::new(true, true),
        mode,
        config: RolloutConfig::default(),
        run_log: None,
        non_interactive: true,
    }
}

fn options() -> ExecutorOptions {
    let mut opts = ExecutorOptions::from_config(&RolloutConfig::default(), BUCKET);
    opts.wait_timeout = Duration::from_secs(30);
    opts.poll_interval = Duration::from_secs(1);
    opts
}

#[tokio::test]
async fn test_non_interactive_run_dispatches_without_prompt() {
    let (_dir, log) = run_log_file();
    let mut ctx = context(OutputMode::Human);
    ctx.run_log = Some(log);
    let inventory = FakeInventory::new().with_region(REGION, &["i-a", "i-b"], &["i-a", "i-b"]);
    let commands = ScriptedCommands::succeeding()
        .with_result("i-a", "Success")
        .with_result("i-b", "Failed");
    let store = MemoryObjectStore::new();

    let report = run::execute(
        &ctx,
        &inventory,
        &commands,
        &store,
        REGION,
        TargetSize::Percent(100),
        &options(),
    )
    .await
    .expect("run");

    let RolloutOutcome::Completed(summary) = &report.outcome else {
        panic!("expected a completed rollout, got {:?}", report.outcome);
    };
    assert_eq!(summary.recorded, 2);
    assert_eq!(commands.sent_requests()[0].instance_ids, ["i-a", "i-b"]);
    assert_eq!(store.object("locks/eu-central-1.lock"), None);
    assert_eq!(store.keys_under("python-logs/eu-central-1/").len(), 1);
    run::print_outcome(&ctx, REGION, &report).expect("print");
}

#[test]
fn test_print_outcome_handles_every_outcome_in_both_modes() {
    let outcomes = [
        RolloutOutcome::Completed(ExecutionSummary {
            command_id: Some(ScriptedCommands::COMMAND_ID.to_string()),
            dispatched: 3,
            recorded: 2,
            skipped: vec!["i-c".to_string()],
            ..ExecutionSummary::default()
        }),
        RolloutOutcome::NothingPending,
        RolloutOutcome::Declined { targets: 4 },
    ];
    for mode in [OutputMode::Human, OutputMode::Json] {
        let ctx = context(mode);
        for outcome in &outcomes {
            let report = RolloutReport {
                outcome: outcome.clone(),
                stages: vec![RolloutStage::Idle, RolloutStage::Locked],
            };
            run::print_outcome(&ctx, REGION, &report).expect("print");
        }
    }
}
