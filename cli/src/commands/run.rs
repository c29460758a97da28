//! `rollout run`: install the agent on a slice of a region's pending instances.

use anyhow::Result;
use clap::{ArgGroup, Args};

use crate::app::AppContext;
use crate::application::ports::{CommandService, InventoryService, ObjectStore};
use crate::application::services::executor::ExecutorOptions;
use crate::application::services::rollout::{
    RolloutOutcome, RolloutReport, RolloutRequest, run_rollout,
};
use crate::commands::{AwsArgs, RegionArgs};
use crate::domain::target::TargetSize;
use crate::infra::aws::AwsContext;
use crate::output::{TerminalReporter, json};

/// Arguments for the run command.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("size").required(true).args(["count", "percent"])))]
pub struct RunArgs {
    #[command(flatten)]
    pub aws: AwsArgs,

    #[command(flatten)]
    pub region: RegionArgs,

    /// Number of pending instances to target
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: Option<u32>,

    /// Percentage of pending instances to target (at least one)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub percent: Option<u32>,
}

/// Entry point for `rollout run`.
///
/// # Errors
///
/// Returns an error if arguments are invalid, the region is locked, or the
/// rollout fails.
pub async fn run(ctx: &AppContext, args: &RunArgs) -> Result<()> {
    let size = TargetSize::from_args(args.count, args.percent)?;
    let resolved = args.aws.resolve(&ctx.config)?;
    let region = args.region.region.as_str();
    let aws = AwsContext::connect(resolved.profile.as_deref(), ctx.config.aws.region.as_deref()).await;
    let options = ExecutorOptions::from_config(&ctx.config, &resolved.bucket);

    let report = execute(
        ctx,
        &aws.inventory(),
        &aws.commands(),
        &aws.object_store(&resolved.bucket),
        region,
        size,
        &options,
    )
    .await?;
    print_outcome(ctx, region, &report)
}

/// Run the rollout against the given ports.
///
/// # Errors
///
/// Returns any error from the rollout.
pub async fn execute(
    ctx: &AppContext,
    inventory: &impl InventoryService,
    commands: &impl CommandService,
    store: &impl ObjectStore,
    region: &str,
    size: TargetSize,
    options: &ExecutorOptions,
) -> Result<RolloutReport> {
    let reporter = TerminalReporter::new(&ctx.output);
    run_rollout(
        inventory,
        commands,
        store,
        ctx,
        &reporter,
        RolloutRequest {
            region,
            size,
            executor: options,
            run_log: ctx.run_log.as_ref(),
        },
    )
    .await
}

/// Print how the rollout ended, as JSON or as a status line.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_outcome(ctx: &AppContext, region: &str, report: &RolloutReport) -> Result<()> {
    if ctx.is_json() {
        let body = match &report.outcome {
            RolloutOutcome::Completed(summary) => serde_json::json!({
                "region": region,
                "outcome": "completed",
                "command_id": summary.command_id,
                "dispatched": summary.dispatched,
                "recorded": summary.recorded,
                "skipped": summary.skipped,
            }),
            RolloutOutcome::NothingPending => serde_json::json!({
                "region": region,
                "outcome": "nothing_pending",
            }),
            RolloutOutcome::Declined { targets } => serde_json::json!({
                "region": region,
                "outcome": "declined",
                "targets": targets,
            }),
        };
        println!("{}", json::to_pretty(&body)?);
        return Ok(());
    }

    match &report.outcome {
        RolloutOutcome::Completed(summary) => {
            if let Some(id) = &summary.command_id {
                ctx.output.info(&format!("Command {id}"));
            }
        }
        RolloutOutcome::NothingPending => {}
        RolloutOutcome::Declined { targets } => {
            ctx.output.warn(&format!("Aborted; {targets} instances in {region} left untouched"));
        }
    }
    Ok(())
}
