//! Acoustic event detection and post-processing.
//!
//! This crate turns spectrograms of environmental recordings into discrete
//! time-frequency events (bird calls, frog calls, clicks) and filters them
//! with geometric and statistical rules. Spectrogram computation happens
//! upstream; the crate starts from the matrix and an optional score array.

#![warn(missing_docs)]

pub mod cli;
pub mod combine;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod scale;
pub mod segment;
pub mod spectrogram;

use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches};
use cli::{Cli, SpectrogramInput};
use config::{Config, load_config_file};
use constants::score::SUMMARY_THRESHOLD;
use event::{AcousticEvent, events_per_unit_time};
use output::{CsvWriter, OutputWriter};
use pipeline::EventDetector;
use std::path::Path;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the acoustic-events CLI.
pub fn run() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging(cli.verbose, cli.quiet);

    // A config named on the command line must exist; one from the
    // environment falls back to defaults when missing.
    let config_from_flag = matches.value_source("config") == Some(ValueSource::CommandLine);
    let mut config = match &cli.config {
        Some(path) if config_from_flag => {
            std::fs::metadata(path).map_err(|source| Error::ConfigRead {
                path: path.clone(),
                source,
            })?;
            load_config_file(path)?
        }
        Some(path) => {
            if !path.exists() {
                warn!(
                    "Config file {} not found, using defaults",
                    path.display()
                );
            }
            load_config_file(path)?
        }
        None => Config::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.detection.threshold = threshold;
    }
    let detector = EventDetector::new(config)?;

    info!("Reading {}", cli.input.display());
    let input = SpectrogramInput::read(&cli.input)?;
    let source = input.source.clone().unwrap_or_else(|| {
        cli.input
            .file_stem()
            .map_or_else(|| cli.input.display().to_string(), |s| s.to_string_lossy().into_owned())
    });
    let segment_start = input.segment_start;
    let (spectrogram, scores) = input.into_spectrogram()?;
    info!(
        "Analysing {source}: {} frames x {} bins, {} mode",
        spectrogram.frame_count(),
        spectrogram.bin_count(),
        detector.detection().mode
    );

    let result = detector.detect(&spectrogram, scores.as_deref(), Some(&source), segment_start)?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("csv"));
    write_events(&output_path, &result.events)?;
    info!(
        "Wrote {} event(s) to {}",
        result.events.len(),
        output_path.display()
    );

    if let Some(unit) = cli.summary_unit {
        #[allow(clippy::cast_precision_loss)]
        let total_duration = segment_start
            + spectrogram.frame_count() as f64 * spectrogram.scale().time.frame_offset();
        for count in events_per_unit_time(&result.events, unit, total_duration, SUMMARY_THRESHOLD)? {
            info!(
                "{:>8.1}s: {} event(s), {} above {SUMMARY_THRESHOLD}",
                count.start, count.total, count.above_threshold
            );
        }
    }

    Ok(())
}

fn write_events(path: &Path, events: &[AcousticEvent]) -> Result<()> {
    let mut writer = CsvWriter::create(path)?;
    writer.write_header()?;
    for event in events {
        writer.write_event(event)?;
    }
    writer.finalize()
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}
