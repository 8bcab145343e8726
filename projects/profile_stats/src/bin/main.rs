use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Duration as ChronoDuration, Local, Utc};
use clap::Parser;
use interfaces_git_working_copy::GitWorkingCopy;
use interfaces_github_repositories::GitHubClient;
use projects_profile_stats::config::{Config, ConfigError};
use projects_profile_stats::cycle::{run_cycle, CycleReport, RunCycleError};
use thiserror::Error;
use tracing::{error, info, warn};
use utils_trace::FailureLog;

/// Keeps a GitHub profile README in sync with repository statistics.
#[derive(Debug, Parser)]
#[command(name = "profile_stats", version)]
struct Args {
    /// JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Run a single cycle and exit instead of looping forever
    #[arg(long)]
    once: bool,
}

#[derive(Debug, Error)]
pub enum MainError {
    #[error("LoadConfig: {source}")]
    LoadConfig {
        #[source]
        source: ConfigError,
    },
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("Cycle: {source}")]
    Cycle {
        #[source]
        source: RunCycleError,
    },
}

async fn cycle(config: &Config, api: &GitHubClient) -> Result<CycleReport, RunCycleError> {
    run_cycle(
        config,
        api,
        |config| GitWorkingCopy::open_or_clone(&config.local_repo_path, &config.clone_url()),
        Utc::now(),
    )
    .await
}

/// Logs the failure and records it in the failure log when one is configured.
fn report_failure(err: &RunCycleError, failure_log: Option<&FailureLog>) {
    error!(error = %err, "cycle failed");

    if let Some(log) = failure_log {
        if let Err(log_err) = log.append(err) {
            warn!(error = %log_err, path = %log.path().display(), "could not record failure");
        }
    }
}

async fn run(args: Args) -> Result<(), MainError> {
    dotenvy::dotenv().ok();

    let config =
        Config::load(&args.config).map_err(|source| MainError::LoadConfig { source })?;

    utils_trace::init(&config.log_level)
        .map_err(|source| MainError::TracingInit { source })?;

    info!(owner = %config.username, branch = %config.branch_name, "starting profile stats");

    let api = GitHubClient::new(config.api_base_url.clone(), config.token.clone());
    let failure_log = config.failure_log.clone().map(FailureLog::new);

    if args.once {
        return match cycle(&config, &api).await {
            Ok(report) => {
                info!(?report, "cycle finished");
                Ok(())
            }
            Err(source) => {
                report_failure(&source, failure_log.as_ref());
                Err(MainError::Cycle { source })
            }
        };
    }

    loop {
        match cycle(&config, &api).await {
            Ok(report) => info!(?report, "cycle finished"),
            Err(err) => report_failure(&err, failure_log.as_ref()),
        }

        let next_run = ChronoDuration::from_std(config.interval())
            .ok()
            .and_then(|interval| Local::now().checked_add_signed(interval));
        match next_run {
            Some(at) => info!(next_run = %at.format("%Y-%m-%d %H:%M:%S"), "waiting for next update"),
            None => info!(seconds = config.interval_secs, "waiting for next update"),
        }

        tokio::time::sleep(config.interval()).await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Tracing may not be installed yet when startup fails.
            eprintln!("profile_stats: {err}");
            ExitCode::FAILURE
        }
    }
}
