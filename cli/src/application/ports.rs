//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `rollout_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::config::RolloutConfig;

// ── Value Types ───────────────────────────────────────────────────────────────

/// One batch remote-command invocation covering many instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Instances targeted by the batch.
    pub instance_ids: Vec<String>,
    /// Remote document to execute.
    pub document_name: String,
    /// Free-text comment attached to the batch.
    pub comment: String,
    /// Bucket the service writes per-instance output into.
    pub output_bucket: String,
    /// Key prefix for per-instance output (`ssm-output/{region}/`).
    pub output_prefix: String,
    /// Value of the document's `PlaybookS3Url` parameter.
    pub playbook_url: String,
}

/// Aggregate state of a dispatched batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    InProgress,
    Cancelling,
    Success,
    Failed,
    Cancelled,
    TimedOut,
}

impl BatchState {
    /// Whether the service will report no further progress for this batch.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Success | Self::Failed | Self::Cancelled | Self::TimedOut
        )
    }
}

// ── Storage Port ──────────────────────────────────────────────────────────────

/// Keyed durable object storage rooted at one configured container.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Read an object, returning `None` if the key does not exist.
    ///
    /// Any other failure is an error.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Write an object, replacing any existing one.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()>;
    /// Create an object only if the key is absent.
    ///
    /// Returns `false` when the key already exists.
    async fn put_if_absent(&self, key: &str, body: Vec<u8>) -> Result<bool>;
    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> Result<bool>;
    /// Delete an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
    /// Upload a local file to `key`.
    async fn upload_file(&self, key: &str, path: &Path) -> Result<()>;
    /// Fully-qualified location of `key`, e.g. `s3://bucket/key`.
    fn uri(&self, key: &str) -> String;
}

// ── Cloud Ports ───────────────────────────────────────────────────────────────

/// Instance inventory queries.
#[allow(async_fn_in_trait)]
pub trait InventoryService {
    /// Regions enabled for the account.
    async fn enabled_regions(&self) -> Result<Vec<String>>;
    /// Every instance in `region`, in any lifecycle state.
    async fn all_instances(&self, region: &str) -> Result<BTreeSet<String>>;
    /// Instances currently checking in to the agent-management service.
    async fn managed_instances(&self, region: &str) -> Result<BTreeSet<String>>;
}

/// Remote command execution.
#[allow(async_fn_in_trait)]
pub trait CommandService {
    /// Dispatch one batch and return its command id.
    async fn send_command(&self, region: &str, request: &CommandRequest) -> Result<String>;
    /// Current aggregate state of a batch.
    async fn batch_status(&self, region: &str, command_id: &str) -> Result<BatchState>;
    /// Raw status of one instance's invocation, or `None` if the service
    /// has no result for it.
    async fn invocation_status(
        &self,
        region: &str,
        command_id: &str,
        instance_id: &str,
    ) -> Result<Option<String>>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading of the rollout configuration file.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or validated.
    fn load(&self) -> Result<RolloutConfig>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Asks the operator to approve an action.
pub trait Confirmer {
    /// Returns `true` only on an explicit affirmative answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown or read.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
