mod args;
mod inputs;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagtoname_core::{
    load_config, load_config_from_env, validate_config, Config, FfprobeExtractor, JobReport,
    Outcome, RunEvent, RunSummary, Scheduler,
};

use args::Cli;
use inputs::expand_inputs;

/// Exit status when at least one file failed.
const EXIT_FAILED_JOBS: u8 = 1;

/// Exit status for usage and configuration errors, matching clap's.
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the new paths.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tagtoname: {:#}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match run(&cli, config).await {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_FAILED_JOBS),
        Err(e) => {
            eprintln!("tagtoname: {:#}", e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}

/// Builds the effective configuration: defaults, file, environment, flags.
fn load(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => load_config_from_env().context("Failed to read configuration")?,
    };
    cli.apply(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

async fn run(cli: &Cli, config: Config) -> Result<RunSummary> {
    let extractor = FfprobeExtractor::new(config.extractor.clone());
    let scheduler =
        Scheduler::new(&config, extractor).context("Failed to create the scheduler")?;
    scheduler
        .validate()
        .await
        .context("Cannot read tags without ffprobe")?;

    let paths = expand_inputs(&cli.paths);
    let mut handle = scheduler.run(paths);

    while let Some(event) = handle.next_event().await {
        match event {
            RunEvent::Outcome(report) => print_report(&report),
            RunEvent::Done(summary) => {
                info!(
                    "{} renamed, {} unchanged, {} failed in {} ms",
                    summary.renamed, summary.unchanged, summary.failed, summary.duration_ms
                );
                return Ok(summary);
            }
        }
    }

    anyhow::bail!("Run {} ended without a summary", handle.run_id())
}

fn print_report(report: &JobReport) {
    match &report.outcome {
        Outcome::Renamed(path) | Outcome::Unchanged(path) => println!("{}", path.display()),
        Outcome::Failed { path, error } => eprintln!("{}: {}", path.display(), error),
    }
}
