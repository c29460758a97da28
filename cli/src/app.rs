//! Application context: unified state passed to every command handler.
//!
//! Adding a new cross-cutting concern requires only one field change here;
//! command signatures stay the same.

use anyhow::Result;

use crate::application::ports::{ConfigStore, Confirmer};
use crate::application::services::run_log::RunLog;
use crate::domain::config::RolloutConfig;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `ROLLOUT_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Settings loaded from the config file, or defaults.
    pub config: RolloutConfig,
    /// This process's log file, uploaded when a command finishes.
    pub run_log: Option<RunLog>,
    /// When `true`, skip interactive prompts and answer yes.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `ROLLOUT_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is unreadable or invalid.
    pub fn new(
        flags: &AppFlags,
        config_store: &impl ConfigStore,
        run_log: Option<RunLog>,
    ) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("ROLLOUT_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config: config_store.load()?,
            run_log,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}

impl Confirmer for AppContext {
    /// Ask the operator for confirmation, defaulting to "no".
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `ROLLOUT_YES`
    /// env), answers yes immediately without prompting.
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.non_interactive {
            tracing::info!(prompt, "confirmation skipped (non-interactive)");
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
