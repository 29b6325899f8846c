//! Chirp - species detection for long-duration field audio recordings.
//!
//! This crate segments recordings into fixed-length windows, runs each
//! window through a multi-label acoustic classifier, and decodes the raw
//! scores into timestamped detection records.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod inference;
pub mod labels;
pub mod pipeline;
pub mod progress;
pub mod utils;

use clap::Parser;
use cli::Cli;
use config::AnalysisConfig;
use inference::{Classifier as _, OnnxClassifier};
use labels::LabelCatalog;
use pipeline::{BatchReport, run_batch};
use std::io::Write;
use tracing::warn;

pub use error::{Error, Result};

/// Main entry point for the chirp CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    // Config file first, CLI flags on top, then validate before any work.
    let mut config = match cli.config.as_deref() {
        Some(path) => config::load_config_file(path)?,
        None => config::load_default_config()?,
    };
    apply_overrides(&mut config, &cli);
    config.validate()?;

    let model_path = cli.model_path.as_deref().ok_or_else(|| {
        Error::InvalidConfiguration {
            message: "no model specified (use --model-path or CHIRP_MODEL_PATH)".to_string(),
        }
    })?;

    // Model load failures are fatal up front; no file can be processed
    // without a classifier.
    let classifier = OnnxClassifier::load(
        model_path,
        config.window_samples(),
        config.location_hint().as_ref(),
    )?;

    let catalog = LabelCatalog::load(cli.labels.as_deref(), classifier.num_classes());

    let progress_enabled = !cli.quiet && !cli.no_progress;
    let report = run_batch(
        &cli.inputs,
        &classifier,
        &catalog,
        &config,
        progress_enabled,
    )?;

    write_detections(&report)?;

    if report.files_failed > 0 {
        warn!("{} file(s) had errors", report.files_failed);
    }

    Ok(())
}

/// Serialize the detection collection as JSON lines on stdout.
///
/// This is the hand-off surface to reporting code; logs and progress stay
/// on stderr.
fn write_detections(report: &BatchReport) -> Result<()> {
    let stdout = std::io::stdout().lock();
    let mut out = std::io::BufWriter::new(stdout);

    for detection in &report.detections {
        serde_json::to_writer(&mut out, detection)
            .map_err(|e| Error::DetectionWrite { source: e })?;
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

/// Overlay CLI flags onto the loaded configuration.
fn apply_overrides(config: &mut AnalysisConfig, cli: &Cli) {
    if let Some(value) = cli.min_confidence {
        config.min_confidence = value;
    }
    if let Some(value) = cli.overlap {
        config.overlap_fraction = value;
    }
    if let Some(value) = cli.window_seconds {
        config.window_seconds = value;
    }
    if let Some(value) = cli.sample_rate {
        config.sample_rate = value;
    }
    if let Some(value) = cli.batch_size {
        config.batch_size = value;
    }
    if cli.lat.is_some() {
        config.latitude = cli.lat;
    }
    if cli.lon.is_some() {
        config.longitude = cli.lon;
    }
    if cli.date.is_some() {
        config.date = cli.date;
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default; raise it with -v levels.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
