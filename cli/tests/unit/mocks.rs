//! Shared in-memory fakes for unit tests.
//!
//! Every port has a hand-written fake here so each test file doesn't have to
//! re-define the same boilerplate. Fakes record what was done to them so
//! tests can assert on side effects without a network.

#![allow(clippy::expect_used, dead_code)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use rollout_cli::application::ports::{
    BatchState, CommandRequest, CommandService, Confirmer, InventoryService, ObjectStore,
    ProgressReporter,
};
use rollout_cli::application::services::run_log::RunLog;

pub const BUCKET: &str = "state-bucket";

pub fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| (*s).to_string()).collect()
}

/// A one-line log file in a temp dir. Keep the dir alive while the log is used.
pub fn run_log_file() -> (tempfile::TempDir, RunLog) {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("rollout-20240101-000000.log");
    let mut file = std::fs::File::create(&path).expect("create log");
    writeln!(file, "run log line").expect("write log");
    let log = RunLog {
        path,
        file_name: "rollout-20240101-000000.log".to_string(),
    };
    (dir, log)
}

// ── ObjectStore ──────────────────────────────────────────────────────────────

/// Bucket held in a map. Records every mutating call as `"{op} {key}"`.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    ops: Mutex<Vec<String>>,
    /// Keys starting with this prefix fail on `put`.
    fail_put_prefix: Option<String>,
    /// `put_if_absent` reports a lost race even though the key is absent.
    lose_conditional_put: bool,
    fail_delete: bool,
    fail_upload: bool,
    fail_get: bool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, key: &str, body: &[u8]) -> Self {
        self.objects
            .lock()
            .expect("lock")
            .insert(key.to_string(), body.to_vec());
        self
    }

    pub fn failing_puts_under(mut self, prefix: &str) -> Self {
        self.fail_put_prefix = Some(prefix.to_string());
        self
    }

    pub fn losing_conditional_put(mut self) -> Self {
        self.lose_conditional_put = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().expect("lock").get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().expect("lock").keys().cloned().collect()
    }

    pub fn keys_under(&self, prefix: &str) -> Vec<String> {
        self.keys()
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect()
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().expect("lock").clone()
    }

    fn record(&self, op: &str, key: &str) {
        self.ops.lock().expect("lock").push(format!("{op} {key}"));
    }
}

impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_get {
            anyhow::bail!("simulated read failure for {key}");
        }
        Ok(self.object(key))
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        if self
            .fail_put_prefix
            .as_deref()
            .is_some_and(|p| key.starts_with(p))
        {
            anyhow::bail!("simulated write failure for {key}");
        }
        self.record("put", key);
        self.objects
            .lock()
            .expect("lock")
            .insert(key.to_string(), body);
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, body: Vec<u8>) -> Result<bool> {
        if self.lose_conditional_put {
            return Ok(false);
        }
        let mut objects = self.objects.lock().expect("lock");
        if objects.contains_key(key) {
            return Ok(false);
        }
        objects.insert(key.to_string(), body);
        drop(objects);
        self.record("create", key);
        Ok(true)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.lock().expect("lock").contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_delete {
            anyhow::bail!("simulated delete failure for {key}");
        }
        self.record("delete", key);
        self.objects.lock().expect("lock").remove(key);
        Ok(())
    }

    async fn upload_file(&self, key: &str, path: &Path) -> Result<()> {
        if self.fail_upload {
            anyhow::bail!("simulated upload failure for {key}");
        }
        let body = std::fs::read(path)?;
        self.record("upload", key);
        self.objects
            .lock()
            .expect("lock")
            .insert(key.to_string(), body);
        Ok(())
    }

    fn uri(&self, key: &str) -> String {
        format!("s3://{BUCKET}/{key}")
    }
}

// ── InventoryService ─────────────────────────────────────────────────────────

/// Fixed inventory per region.
#[derive(Default)]
pub struct FakeInventory {
    regions: Vec<String>,
    all: BTreeMap<String, BTreeSet<String>>,
    managed: BTreeMap<String, BTreeSet<String>>,
    failing_region: Option<String>,
    pub probes: AtomicUsize,
}

impl FakeInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enabled region with its instances and managed subset.
    pub fn with_region(mut self, region: &str, all: &[&str], managed: &[&str]) -> Self {
        self.regions.push(region.to_string());
        self.all.insert(region.to_string(), set(all));
        self.managed.insert(region.to_string(), set(managed));
        self
    }

    pub fn failing_in(mut self, region: &str) -> Self {
        self.failing_region = Some(region.to_string());
        self
    }

    fn check(&self, region: &str) -> Result<()> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.failing_region.as_deref() == Some(region) {
            anyhow::bail!("simulated inventory failure in {region}");
        }
        Ok(())
    }
}

impl InventoryService for FakeInventory {
    async fn enabled_regions(&self) -> Result<Vec<String>> {
        Ok(self.regions.clone())
    }

    async fn all_instances(&self, region: &str) -> Result<BTreeSet<String>> {
        self.check(region)?;
        Ok(self.all.get(region).cloned().unwrap_or_default())
    }

    async fn managed_instances(&self, region: &str) -> Result<BTreeSet<String>> {
        self.check(region)?;
        Ok(self.managed.get(region).cloned().unwrap_or_default())
    }
}

// ── CommandService ───────────────────────────────────────────────────────────

/// Command service that replays a script of batch states and per-instance
/// results. The last batch state repeats once the script runs out.
pub struct ScriptedCommands {
    states: Mutex<VecDeque<BatchState>>,
    last_state: Mutex<BatchState>,
    results: BTreeMap<String, String>,
    pub sent: Mutex<Vec<CommandRequest>>,
    pub status_polls: AtomicUsize,
    fail_send: bool,
}

impl ScriptedCommands {
    pub const COMMAND_ID: &'static str = "cmd-0001";

    pub fn new(states: &[BatchState]) -> Self {
        Self {
            states: Mutex::new(states.iter().copied().collect()),
            last_state: Mutex::new(BatchState::Pending),
            results: BTreeMap::new(),
            sent: Mutex::new(Vec::new()),
            status_polls: AtomicUsize::new(0),
            fail_send: false,
        }
    }

    /// A batch that is already `Success` on the first poll.
    pub fn succeeding() -> Self {
        Self::new(&[BatchState::Success])
    }

    pub fn with_result(mut self, instance_id: &str, status: &str) -> Self {
        self.results
            .insert(instance_id.to_string(), status.to_string());
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn sent_requests(&self) -> Vec<CommandRequest> {
        self.sent.lock().expect("lock").clone()
    }
}

impl CommandService for ScriptedCommands {
    async fn send_command(&self, region: &str, request: &CommandRequest) -> Result<String> {
        if self.fail_send {
            anyhow::bail!("simulated send failure in {region}");
        }
        self.sent.lock().expect("lock").push(request.clone());
        Ok(Self::COMMAND_ID.to_string())
    }

    async fn batch_status(&self, _region: &str, _command_id: &str) -> Result<BatchState> {
        self.status_polls.fetch_add(1, Ordering::SeqCst);
        let mut last = self.last_state.lock().expect("lock");
        if let Some(next) = self.states.lock().expect("lock").pop_front() {
            *last = next;
        }
        Ok(*last)
    }

    async fn invocation_status(
        &self,
        _region: &str,
        _command_id: &str,
        instance_id: &str,
    ) -> Result<Option<String>> {
        Ok(self.results.get(instance_id).cloned())
    }
}

// ── Confirmer ────────────────────────────────────────────────────────────────

/// Gives the same answer every time and counts how often it was asked.
pub struct FixedConfirmer {
    answer: bool,
    pub asked: AtomicUsize,
}

impl FixedConfirmer {
    pub fn yes() -> Self {
        Self {
            answer: true,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirmer for FixedConfirmer {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

// ── ProgressReporter ─────────────────────────────────────────────────────────

/// Collects reported messages as `"{kind}: {message}"`.
#[derive(Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("lock").clone()
    }

    fn push(&self, kind: &str, message: &str) {
        self.messages
            .lock()
            .expect("lock")
            .push(format!("{kind}: {message}"));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }

    fn success(&self, message: &str) {
        self.push("success", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
}
