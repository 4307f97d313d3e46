//! exif-inspector - Decode Exif metadata and GPS positions from images.
//!
//! This binary parses the command line, inspects the given files and prints
//! reports to stdout. Logs go to stderr so JSON output stays machine-readable.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_inspector::{
    config::{Cli, Command, CommonOptions, GpsConfig, InspectConfig, OutputFormat},
    inspect::{render_gps, render_text, FileOutcome, GpsItem, Inspector, ReportItem},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Inspect(config) => run_inspect(config).await,
        Command::Gps(config) => run_gps(config).await,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exif_inspector=debug"
    } else {
        "exif_inspector=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Validate options and run the inspector over all files.
async fn run_files(
    common: &CommonOptions,
    digest: bool,
    validation: Result<(), String>,
) -> Option<Vec<FileOutcome>> {
    init_logging(common.verbose);

    if let Err(e) = validation {
        error!("Configuration error: {}", e);
        return None;
    }

    info!(
        files = common.files.len(),
        jobs = common.jobs,
        "inspecting"
    );

    let inspector = Inspector::new(common.jobs)
        .with_max_file_size(common.max_file_size)
        .with_digest(digest);

    Some(inspector.inspect_paths(common.files.iter().cloned()).await)
}

/// Exit status: failure if any file could not be decoded.
fn exit_code(outcomes: &[FileOutcome]) -> ExitCode {
    if outcomes.iter().all(FileOutcome::is_ok) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Exit status for `gps`: failure if any position could not be computed.
///
/// Files that failed to load or decode are reported as invalid positions.
fn gps_exit_code(items: &[GpsItem]) -> ExitCode {
    if items.iter().any(|item| item.gps.is_invalid()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Serialize `items` as pretty JSON to stdout.
fn print_json<T: serde::Serialize>(items: &T) -> bool {
    match serde_json::to_string_pretty(items) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            false
        }
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

async fn run_inspect(config: InspectConfig) -> ExitCode {
    let Some(outcomes) = run_files(&config.common, config.digest, config.validate()).await else {
        return ExitCode::FAILURE;
    };

    match config.common.format {
        OutputFormat::Json => {
            let items: Vec<ReportItem> = outcomes.iter().map(ReportItem::from).collect();
            if !print_json(&items) {
                return ExitCode::FAILURE;
            }
        }
        OutputFormat::Text => {
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(report) => println!("{}", render_text(report)),
                    Err(e) => {
                        println!("{}", outcome.path);
                        println!("  error: {}", e);
                        println!();
                    }
                }
            }
        }
    }

    exit_code(&outcomes)
}

// =============================================================================
// GPS Command
// =============================================================================

async fn run_gps(config: GpsConfig) -> ExitCode {
    let Some(outcomes) = run_files(&config.common, false, config.validate()).await else {
        return ExitCode::FAILURE;
    };

    let items: Vec<GpsItem> = outcomes.iter().map(GpsItem::from).collect();
    match config.common.format {
        OutputFormat::Json => {
            if !print_json(&items) {
                return ExitCode::FAILURE;
            }
        }
        OutputFormat::Text => {
            for item in &items {
                println!("{}: {}", item.path, render_gps(&item.gps));
            }
        }
    }

    gps_exit_code(&items)
}
