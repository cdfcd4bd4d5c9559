//! CLI argument definitions.

use crate::cli::validators::{parse_finite, parse_seconds};
use crate::constants::{APP_NAME, env};
use clap::Parser;
use std::path::PathBuf;

/// Detect acoustic events in a spectrogram and write them as a CSV table.
#[derive(Debug, Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Spectrogram input document (JSON).
    pub input: PathBuf,

    /// Detector configuration file (TOML). Defaults apply when absent.
    #[arg(short, long, env = env::CONFIG)]
    pub config: Option<PathBuf>,

    /// Output CSV file (default: input path with a .csv extension).
    #[arg(short, long, env = env::OUTPUT)]
    pub output: Option<PathBuf>,

    /// Override the configured detection threshold.
    #[arg(short, long, value_parser = parse_finite)]
    pub threshold: Option<f64>,

    /// Log event counts per unit of this many seconds.
    #[arg(long, value_parser = parse_seconds)]
    pub summary_unit: Option<f64>,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
