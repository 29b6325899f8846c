//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "chirp";

/// Default analysis window length in seconds.
pub const DEFAULT_WINDOW_SECONDS: f32 = 5.0;

/// Default overlap between consecutive windows, as a fraction of the window.
pub const DEFAULT_OVERLAP_FRACTION: f32 = 0.0;

/// Default minimum confidence threshold for detections.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.1;

/// Default target sample rate in Hz expected by the acoustic model.
pub const DEFAULT_SAMPLE_RATE: u32 = 32_000;

/// Default number of windows submitted per forward pass.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Maximum allowed batch size to prevent memory exhaustion.
pub const MAX_BATCH_SIZE: usize = 512;

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
}

/// Header names accepted as the label column in a catalog file.
pub const LABEL_COLUMNS: &[&str] = &["ebird2021", "species", "label", "common_name", "name"];

/// Recording timestamp format embedded in file names (`YYYYMMDD_HHMMSS`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Length in bytes of the file-name timestamp pattern.
pub const TIMESTAMP_LEN: usize = 15;
