//! Domain types and validators for rollout configuration.
//!
//! Pure functions only, no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ConfigError, UsageError};

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.rollout/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RolloutConfig {
    /// Cloud account settings.
    pub aws: AwsConfig,
    /// Remote command settings.
    pub command: CommandConfig,
    /// Batch wait policy.
    pub wait: WaitConfig,
}

/// Cloud account settings. CLI flags and env vars take precedence.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AwsConfig {
    pub profile: Option<String>,
    pub bucket: Option<String>,
    /// Home region for the state bucket and region enumeration.
    /// Falls back to the profile's region.
    pub region: Option<String>,
}

/// What gets executed on each target instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CommandConfig {
    /// Remote document that installs the agent.
    pub document_name: String,
    /// Playbook location passed as `PlaybookS3Url`. Derived from the bucket when unset.
    pub playbook_url: Option<String>,
    pub comment: String,
    /// Path segment the execution service writes stdout/stderr under.
    pub output_plugin_dir: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            document_name: "AWS-ApplyAnsiblePlaybooks".to_string(),
            playbook_url: None,
            comment: "Deploy agent via rollout".to_string(),
            output_plugin_dir: "awsrunShellScript/0.awsrunShellScript".to_string(),
        }
    }
}

impl CommandConfig {
    /// Playbook URL, falling back to `s3://{bucket}/ansible/agent.yml`.
    #[must_use]
    pub fn playbook_url_for(&self, bucket: &str) -> String {
        self.playbook_url
            .clone()
            .unwrap_or_else(|| format!("s3://{bucket}/ansible/agent.yml"))
    }
}

/// How long to wait for a batch and how often to poll it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WaitConfig {
    pub timeout_secs: u64,
    pub poll_interval_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 3600,
            poll_interval_secs: 5,
        }
    }
}

impl WaitConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration.
///
/// # Errors
///
/// Returns an error if a wait duration is zero or the document name is empty.
pub fn validate_config(config: &RolloutConfig) -> Result<()> {
    if config.wait.timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: "wait.timeout_secs",
            reason: "must be greater than zero",
        }
        .into());
    }
    if config.wait.poll_interval_secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: "wait.poll_interval_secs",
            reason: "must be greater than zero",
        }
        .into());
    }
    if config.command.document_name.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "command.document_name",
            reason: "must not be empty",
        }
        .into());
    }
    Ok(())
}

/// Resolve the state bucket: explicit value first, then the config file.
///
/// # Errors
///
/// Returns `UsageError::MissingBucket` if neither source provides one.
pub fn resolve_bucket(explicit: Option<&str>, config: &RolloutConfig) -> Result<String, UsageError> {
    explicit
        .or(config.aws.bucket.as_deref())
        .filter(|b| !b.trim().is_empty())
        .map(str::to_string)
        .ok_or(UsageError::MissingBucket)
}

/// Resolve the named profile: explicit value first, then the config file.
#[must_use]
pub fn resolve_profile(explicit: Option<&str>, config: &RolloutConfig) -> Option<String> {
    explicit
        .or(config.aws.profile.as_deref())
        .map(str::to_string)
}

/// Validate a region name supplied on the command line.
///
/// # Errors
///
/// Returns `UsageError::InvalidRegion` if the name is malformed.
pub fn validate_region_arg(region: &str) -> Result<(), UsageError> {
    rollout_common::validate_region(region).map_err(|reason| UsageError::InvalidRegion {
        region: region.to_string(),
        reason,
    })
}
