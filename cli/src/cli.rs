//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::application::services::run_log::RunLog;
use crate::commands;
use crate::infra::config::YamlConfigStore;

/// Roll the monitoring agent out across cloud regions and track its status
#[derive(Parser)]
#[command(
    name = "rollout",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log debug detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show deployment status for every region with instances
    Report(commands::report::ReportArgs),

    /// Install the agent on pending instances in one region
    Run(commands::run::RunArgs),

    /// Print instances whose last run failed
    ListFailed(commands::list::ListArgs),

    /// Print instances not registered with the management service
    ListUnmanaged(commands::list::ListArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self, run_log: Option<RunLog>) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            yes,
            command,
        } = self;
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        };
        let ctx = AppContext::new(&flags, &YamlConfigStore, run_log)?;

        match command {
            Command::Report(args) => commands::report::run(&ctx, &args).await,
            Command::Run(args) => commands::run::run(&ctx, &args).await,
            Command::ListFailed(args) => commands::list::failed(&ctx, &args).await,
            Command::ListUnmanaged(args) => commands::list::unmanaged(&ctx, &args).await,
        }
    }
}
