//! `rollout report`: deployment status across every region with instances.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use rollout_common::RegionReport;

use crate::app::AppContext;
use crate::application::ports::{InventoryService, ObjectStore};
use crate::application::services::{report, run_log};
use crate::commands::AwsArgs;
use crate::infra::aws::AwsContext;
use crate::output::{json, render_report_table};

/// Arguments for the report command.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub aws: AwsArgs,
}

/// Entry point for `rollout report`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, any region cannot be
/// probed, or the snapshot cannot be saved.
pub async fn run(ctx: &AppContext, args: &ReportArgs) -> Result<()> {
    let resolved = args.aws.resolve(&ctx.config)?;
    let aws = AwsContext::connect(resolved.profile.as_deref(), ctx.config.aws.region.as_deref()).await;
    execute(ctx, &aws.inventory(), &aws.object_store(&resolved.bucket), Utc::now()).await
}

/// Build, print and persist the report.
///
/// The table is printed and the run log uploaded even if the snapshot write
/// fails; the write error is returned afterwards.
///
/// # Errors
///
/// Returns an error if the reports cannot be collected or the snapshot
/// cannot be saved.
pub async fn execute(
    ctx: &AppContext,
    inventory: &impl InventoryService,
    store: &impl ObjectStore,
    at: DateTime<Utc>,
) -> Result<()> {
    let reports = report::collect_region_reports(inventory, store).await?;
    let saved = report::persist_snapshot(store, &reports, at).await;
    let printed = print_reports(ctx, &reports);

    if let (Some(first), Some(log)) = (reports.first(), ctx.run_log.as_ref()) {
        run_log::upload(store, &first.region, log).await;
    }

    let key = saved?;
    printed?;
    if !ctx.is_json() {
        ctx.output.success(&format!("Report saved to {}", store.uri(&key)));
    }
    Ok(())
}

fn print_reports(ctx: &AppContext, reports: &[RegionReport]) -> Result<()> {
    if ctx.is_json() {
        println!("{}", json::to_pretty(reports)?);
    } else if reports.is_empty() {
        ctx.output.info("No regions with instances");
    } else {
        println!("{}", render_report_table(reports));
    }
    Ok(())
}
