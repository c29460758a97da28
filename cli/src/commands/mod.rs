//! Command implementations

pub mod list;
pub mod report;
pub mod run;

use anyhow::Result;
use clap::Args;

use crate::domain::config::{RolloutConfig, resolve_bucket, resolve_profile, validate_region_arg};
use crate::domain::error::UsageError;

/// Account and bucket selection shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct AwsArgs {
    /// Named AWS profile
    #[arg(long, env = "ROLLOUT_PROFILE")]
    pub profile: Option<String>,

    /// Bucket holding state, locks, reports and run logs
    #[arg(long, env = "ROLLOUT_BUCKET")]
    pub bucket: Option<String>,
}

/// Profile and bucket after applying config-file fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAws {
    pub profile: Option<String>,
    pub bucket: String,
}

impl AwsArgs {
    /// Apply config-file fallbacks.
    ///
    /// # Errors
    ///
    /// Returns `UsageError::MissingBucket` if no bucket is configured anywhere.
    pub fn resolve(&self, config: &RolloutConfig) -> Result<ResolvedAws, UsageError> {
        Ok(ResolvedAws {
            profile: resolve_profile(self.profile.as_deref(), config),
            bucket: resolve_bucket(self.bucket.as_deref(), config)?,
        })
    }
}

/// Region selection for single-region commands.
#[derive(Args, Debug, Clone)]
pub struct RegionArgs {
    /// Region to operate on, e.g. us-east-1
    #[arg(long, value_parser = parse_region)]
    pub region: String,
}

fn parse_region(raw: &str) -> Result<String, UsageError> {
    validate_region_arg(raw)?;
    Ok(raw.to_string())
}
