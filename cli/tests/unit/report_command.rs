//! Unit tests for the `report` command handler.

#![allow(clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};
use rollout_cli::app::{AppContext, OutputMode};
use rollout_cli::application::services::run_log::RunLog;
use rollout_cli::commands::report;
use rollout_cli::domain::config::RolloutConfig;
use rollout_cli::output::OutputContext;

use crate::mocks::{FakeInventory, MemoryObjectStore, run_log_file};

const SNAPSHOT: &str = "reports/all-regions-report-20240305-120000.json";

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn context(mode: OutputMode, run_log: Option<RunLog>) -> AppContext {
    AppContext {
        output: OutputContext::new(true, true),
        mode,
        config: RolloutConfig::default(),
        run_log,
        non_interactive: true,
    }
}

fn inventory() -> FakeInventory {
    FakeInventory::new()
        .with_region("us-east-1", &["i-1", "i-2"], &["i-1"])
        .with_region("eu-west-1", &[], &[])
        .with_region("us-west-2", &["i-9"], &["i-9"])
}

#[tokio::test]
async fn test_report_saves_snapshot_and_uploads_log_under_first_region() {
    let (_dir, log) = run_log_file();
    let ctx = context(OutputMode::Human, Some(log));
    let store = MemoryObjectStore::new();

    report::execute(&ctx, &inventory(), &store, at())
        .await
        .expect("report");

    let snapshot = store.object(SNAPSHOT).expect("snapshot written");
    let body: serde_json::Value = serde_json::from_slice(&snapshot).expect("snapshot json");
    let regions: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["region"].as_str())
        .collect();
    assert_eq!(regions, ["us-east-1", "us-west-2"]);
    assert_eq!(store.keys_under("python-logs/us-east-1/").len(), 1);
    assert!(store.keys_under("python-logs/us-west-2/").is_empty());
}

#[tokio::test]
async fn test_snapshot_failure_is_returned_after_log_upload() {
    for mode in [OutputMode::Human, OutputMode::Json] {
        let (_dir, log) = run_log_file();
        let ctx = context(mode, Some(log));
        let store = MemoryObjectStore::new().failing_puts_under("reports/");

        let err = report::execute(&ctx, &inventory(), &store, at())
            .await
            .expect_err("snapshot write fails");

        assert!(err.root_cause().to_string().contains(SNAPSHOT), "{err:#}");
        assert!(store.keys_under("reports/").is_empty());
        assert_eq!(
            store.keys_under("python-logs/us-east-1/").len(),
            1,
            "log uploaded in {mode:?} mode"
        );
    }
}

#[tokio::test]
async fn test_empty_account_skips_log_upload() {
    let (_dir, log) = run_log_file();
    let ctx = context(OutputMode::Human, Some(log));
    let store = MemoryObjectStore::new();
    let inventory = FakeInventory::new().with_region("eu-west-1", &[], &[]);

    report::execute(&ctx, &inventory, &store, at())
        .await
        .expect("report");

    assert!(store.object(SNAPSHOT).is_some(), "empty snapshot still saved");
    assert!(store.keys_under("python-logs/").is_empty());
}

#[tokio::test]
async fn test_region_failure_writes_nothing() {
    let ctx = context(OutputMode::Human, None);
    let store = MemoryObjectStore::new();
    let inventory = inventory().failing_in("us-west-2");

    let result = report::execute(&ctx, &inventory, &store, at()).await;

    assert!(result.is_err());
    assert!(store.ops().is_empty());
}
