//! tracie command-line interface
//!
//! Replays every trace of a manifest that has an expectation for the given
//! device(s), writes `results.yml` (and optionally JUnit XML) and exits
//! non-zero when any trace failed.
//!
//! ```bash
//! tracie --file traces.yml --device-name gl-test-device
//! ```

mod args;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracie_core::{CommandReplayer, RunExecutor};

use args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = cli.run_config();
    let replayer = CommandReplayer::new(&cli.replayer)
        .with_args(cli.replay_args.clone())
        .with_timeout(config.replay_timeout);

    let executor = RunExecutor::new(config, Box::new(replayer)).context("Failed to set up the run")?;
    let summary = executor
        .run_manifest_file(&cli.file, &cli.device_names)
        .await
        .with_context(|| format!("Failed to check traces of {}", cli.file.display()))?;

    if summary.passed {
        tracing::info!("All {} trace(s) passed", summary.evaluated());
    } else {
        tracing::warn!(
            "{} of {} trace(s) failed; see {}",
            summary.failures(),
            summary.evaluated(),
            executor.config().results_dir.display()
        );
    }
    Ok(summary.passed)
}
