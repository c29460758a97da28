//! `rollout list-failed` and `rollout list-unmanaged`.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{InventoryService, ObjectStore};
use crate::application::services::listing;
use crate::commands::{AwsArgs, RegionArgs};
use crate::infra::aws::AwsContext;
use crate::output::json;

/// Arguments shared by the listing commands.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub aws: AwsArgs,

    #[command(flatten)]
    pub region: RegionArgs,
}

/// Entry point for `rollout list-failed`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the state cannot be read.
pub async fn failed(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let resolved = args.aws.resolve(&ctx.config)?;
    let region = args.region.region.as_str();
    let aws = AwsContext::connect(resolved.profile.as_deref(), ctx.config.aws.region.as_deref()).await;
    println!("{}", render_failed(&aws.object_store(&resolved.bucket), region).await?);
    Ok(())
}

/// Entry point for `rollout list-unmanaged`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or inventory cannot be listed.
pub async fn unmanaged(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let resolved = args.aws.resolve(&ctx.config)?;
    let region = args.region.region.as_str();
    let aws = AwsContext::connect(resolved.profile.as_deref(), ctx.config.aws.region.as_deref()).await;
    println!("{}", render_unmanaged(&aws.inventory(), region).await?);
    Ok(())
}

/// Failed state entries of `region` as a pretty JSON object.
///
/// # Errors
///
/// Returns an error if the state cannot be read.
pub async fn render_failed(store: &impl ObjectStore, region: &str) -> Result<String> {
    let failed = listing::failed_instances(store, region).await?;
    json::to_pretty(&failed)
}

/// Unmanaged instance ids of `region` as a pretty JSON array.
///
/// # Errors
///
/// Returns an error if inventory cannot be listed.
pub async fn render_unmanaged(inventory: &impl InventoryService, region: &str) -> Result<String> {
    let unmanaged = listing::unmanaged_instances(inventory, region).await?;
    json::to_pretty(&unmanaged)
}
