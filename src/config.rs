//! Command-line configuration for exif-inspector.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `EXIF_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use exif_inspector::config::{Cli, Command};
//! use clap::Parser;
//!
//! match Cli::parse().command {
//!     Command::Inspect(config) => println!("{} file(s)", config.files.len()),
//!     Command::Gps(config) => println!("{} job(s)", config.jobs),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `EXIF_JOBS` - Files processed concurrently (default: 4)
//! - `EXIF_MAX_FILE_SIZE` - Largest file loaded into memory, in bytes (default: 256 MiB)
//! - `RUST_LOG` - Overrides the log filter

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::inspect::DEFAULT_JOBS;
use crate::io::DEFAULT_MAX_FILE_SIZE;

// =============================================================================
// Default Values
// =============================================================================

/// Upper bound on `--jobs`.
pub const MAX_JOBS: usize = 256;

// =============================================================================
// CLI Arguments
// =============================================================================

/// exif-inspector - Decode Exif metadata and GPS positions from images.
///
/// Reads JPEG files, TIFF files and raw Exif payloads, decodes every tag
/// directory and reports the tags and the GPS position.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-inspector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print every decoded tag of each file.
    Inspect(InspectConfig),

    /// Print only the GPS position of each file.
    ///
    /// Exits with failure if any file cannot be decoded or carries a
    /// corrupt GPS position. Files without GPS tags are not failures.
    Gps(GpsConfig),
}

/// Output format for reports.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON array on stdout
    Json,
}

/// Options shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct CommonOptions {
    /// Image files to read.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Number of files processed concurrently.
    #[arg(short, long, default_value_t = DEFAULT_JOBS, env = "EXIF_JOBS")]
    pub jobs: usize,

    /// Largest file loaded into memory, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE, env = "EXIF_MAX_FILE_SIZE")]
    pub max_file_size: u64,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CommonOptions {
    /// Validate the options and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() {
            return Err("At least one file is required".to_string());
        }

        if self.jobs == 0 || self.jobs > MAX_JOBS {
            return Err(format!("jobs must be between 1 and {}", MAX_JOBS));
        }

        if self.max_file_size == 0 {
            return Err("max_file_size must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Configuration for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    #[command(flatten)]
    pub common: CommonOptions,

    /// Include the SHA-256 digest of each file.
    #[arg(long, default_value_t = false)]
    pub digest: bool,
}

impl InspectConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.common.validate()
    }
}

/// Configuration for the `gps` subcommand.
#[derive(Args, Debug, Clone)]
pub struct GpsConfig {
    #[command(flatten)]
    pub common: CommonOptions,
}

impl GpsConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.common.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
