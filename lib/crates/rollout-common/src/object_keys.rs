use chrono::{DateTime, Utc};

/// Top-level prefixes inside the state bucket.
pub mod prefixes {
    /// Per-region instance state.
    /// Format: state/region-{region}/instances.json
    /// Value: JSON object, instance id → InstanceRecord
    pub const STATE: &str = "state";

    /// Per-region execution locks.
    /// Format: locks/{region}.lock
    /// Value: opaque marker, only existence matters
    pub const LOCKS: &str = "locks";

    /// Cross-region report snapshots.
    /// Format: reports/all-regions-report-{YYYYmmdd-HHMMSS}.json
    /// Value: JSON array of RegionReport
    pub const REPORTS: &str = "reports";

    /// Uploaded run logs.
    /// Format: python-logs/{region}/{YYYY}/{MM}/{DD}/{logfile}
    pub const RUN_LOGS: &str = "python-logs";

    /// Remote command output written by the execution service.
    /// Format: ssm-output/{region}/{command_id}/{instance_id}/{plugin_dir}/stdout|stderr
    pub const COMMAND_OUTPUT: &str = "ssm-output";
}

/// Marker body written into lock objects.
pub const LOCK_BODY: &[u8] = b"locked";

/// Captured output stream of a remote invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

pub fn state_key(region: &str) -> String {
    format!("{}/region-{region}/instances.json", prefixes::STATE)
}

pub fn lock_key(region: &str) -> String {
    format!("{}/{region}.lock", prefixes::LOCKS)
}

pub fn report_snapshot_key(at: DateTime<Utc>) -> String {
    format!(
        "{}/all-regions-report-{}.json",
        prefixes::REPORTS,
        at.format("%Y%m%d-%H%M%S")
    )
}

pub fn run_log_key(region: &str, at: DateTime<Utc>, file_name: &str) -> String {
    format!(
        "{}/{region}/{}/{file_name}",
        prefixes::RUN_LOGS,
        at.format("%Y/%m/%d")
    )
}

/// Prefix handed to the execution service for its output uploads.
/// Carries a trailing slash so the service appends `{command_id}/...`.
pub fn command_output_prefix(region: &str) -> String {
    format!("{}/{region}/", prefixes::COMMAND_OUTPUT)
}

pub fn command_output_key(
    region: &str,
    command_id: &str,
    instance_id: &str,
    plugin_dir: &str,
    stream: OutputStream,
) -> String {
    format!(
        "{}{command_id}/{instance_id}/{plugin_dir}/{}",
        command_output_prefix(region),
        stream.as_str()
    )
}

/// Validate that a region name looks like `us-east-1` / `us-gov-west-1`.
///
/// Region names are interpolated into object keys, so anything outside
/// lowercase letters, digits and dashes is rejected.
pub fn validate_region(region: &str) -> Result<(), &'static str> {
    if region.is_empty() || region.len() > 32 {
        return Err("region must be between 1 and 32 characters");
    }
    let parts: Vec<&str> = region.split('-').collect();
    let Some((number, words)) = parts.split_last() else {
        return Err("region must look like 'us-east-1'");
    };
    if words.len() < 2 {
        return Err("region must look like 'us-east-1'");
    }
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err("region must end with a number");
    }
    if words
        .iter()
        .any(|w| w.is_empty() || !w.chars().all(|c| c.is_ascii_lowercase()))
    {
        return Err("region segments must be lowercase letters");
    }
    if words[0].len() != 2 {
        return Err("region must start with a two-letter area code");
    }
    Ok(())
}
