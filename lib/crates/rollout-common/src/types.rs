use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Per-instance outcome as reported by the remote-execution service.
///
/// Only `SUCCEEDED` and `FAILED` carry meaning for reporting; every other
/// value the service may return (`TimedOut`, `Cancelled`, ...) is kept
/// verbatim so it round-trips through the state object unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvocationStatus {
    Succeeded,
    Failed,
    Other(String),
}

impl InvocationStatus {
    /// Map a raw service status onto the persisted vocabulary.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "SUCCEEDED" | "Success" | "Succeeded" => Self::Succeeded,
            "FAILED" | "Failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for InvocationStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<InvocationStatus> for String {
    fn from(status: InvocationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-known deployment outcome for one instance in one region.
///
/// Records are always written whole; there is no partial update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceRecord {
    pub status: InvocationStatus,
    /// Batch that last touched this instance.
    pub command_id: String,
    /// Accepts legacy timestamps written without an offset (read as UTC).
    #[serde(deserialize_with = "deserialize_utc_lenient")]
    pub last_run: DateTime<Utc>,
    pub stdout_log: String,
    pub stderr_log: String,
}

/// Instance id → record, persisted as one object per region.
pub type RegionState = BTreeMap<String, InstanceRecord>;

fn deserialize_utc_lenient<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// Aggregate deployment counts for one region.
///
/// Derived on every report run; never a source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionReport {
    pub region: String,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub unmanaged: usize,
    pub pending: usize,
    /// `failed + unmanaged + pending`.
    pub uninstalled: usize,
}

impl RegionReport {
    /// Integer percentage of `count` against `total`, with an empty region
    /// treated as a total of one.
    #[must_use]
    pub fn percent_of(&self, count: usize) -> usize {
        count * 100 / self.total.max(1)
    }
}
