//! CLI argument definitions.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Species detection for long-duration field audio recordings.
#[derive(Debug, Parser)]
#[command(name = "chirp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Audio files to analyze, in order.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Path to the ONNX model file.
    #[arg(short, long, env = "CHIRP_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Path to the label catalog file.
    #[arg(short, long, env = "CHIRP_LABELS_PATH")]
    pub labels: Option<PathBuf>,

    /// Path to a config file (default: platform config directory).
    #[arg(long, env = "CHIRP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimum confidence threshold (0.0-1.0).
    #[arg(short = 'c', long, value_parser = parse_confidence, env = "CHIRP_MIN_CONFIDENCE")]
    pub min_confidence: Option<f32>,

    /// Window overlap as a fraction of the window length, in [0, 1).
    #[arg(long, env = "CHIRP_OVERLAP")]
    pub overlap: Option<f32>,

    /// Analysis window length in seconds.
    #[arg(long, env = "CHIRP_WINDOW_SECONDS")]
    pub window_seconds: Option<f32>,

    /// Target sample rate in Hz.
    #[arg(long, env = "CHIRP_SAMPLE_RATE")]
    pub sample_rate: Option<u32>,

    /// Inference batch size.
    #[arg(short, long, env = "CHIRP_BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Recording site latitude (-90.0 to 90.0).
    #[arg(long, requires = "lon")]
    pub lat: Option<f64>,

    /// Recording site longitude (-180.0 to 180.0).
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,

    /// Reference date for seasonal conditioning (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

/// Parse and range-check a confidence value.
fn parse_confidence(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("confidence must be between 0.0 and 1.0, got {value}"))
    }
}
