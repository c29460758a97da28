//! rollout - agent deployment across cloud regions

use clap::Parser;

use rollout_cli::cli::Cli;
use rollout_cli::infra::logging;
use rollout_cli::output::json;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    let run_log = match logging::init(cli.verbose) {
        Ok(log) => Some(log),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };
    if let Err(e) = cli.run(run_log).await {
        tracing::error!(error = %format!("{e:#}"), "command failed");
        // stdout carries at most one JSON document, so the error object goes to stderr.
        if json_mode {
            if let Ok(body) = json::format_error(&format!("{e:#}"), json::error_code(&e)) {
                eprintln!("{body}");
            }
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
