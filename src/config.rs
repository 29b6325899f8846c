//! Analysis configuration.

use crate::constants::{
    APP_NAME, DEFAULT_BATCH_SIZE, DEFAULT_MIN_CONFIDENCE, DEFAULT_OVERLAP_FRACTION,
    DEFAULT_SAMPLE_RATE, DEFAULT_WINDOW_SECONDS, MAX_BATCH_SIZE, confidence,
};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings recognized by the analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Window length in seconds.
    pub window_seconds: f32,

    /// Fraction of each window shared with the next, in `[0, 1)`.
    pub overlap_fraction: f32,

    /// Minimum confidence threshold (inclusive).
    pub min_confidence: f32,

    /// Target sample rate in Hz; decoded audio is resampled to this rate.
    pub sample_rate: u32,

    /// Number of windows submitted per forward pass.
    pub batch_size: usize,

    /// Recording site latitude, for location-conditioned models.
    pub latitude: Option<f64>,

    /// Recording site longitude, for location-conditioned models.
    pub longitude: Option<f64>,

    /// Reference date, for date-conditioned models.
    pub date: Option<NaiveDate>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            overlap_fraction: DEFAULT_OVERLAP_FRACTION,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            batch_size: DEFAULT_BATCH_SIZE,
            latitude: None,
            longitude: None,
            date: None,
        }
    }
}

impl AnalysisConfig {
    /// Samples per window at the configured rate.
    pub fn window_samples(&self) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let samples =
            (f64::from(self.window_seconds) * f64::from(self.sample_rate)).round() as usize;
        samples
    }

    /// Validate all settings, rejecting the run before any file is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("window_seconds must be positive, got {}", self.window_seconds),
            });
        }

        if !(0.0..1.0).contains(&self.overlap_fraction) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "overlap_fraction must be in [0, 1), got {}",
                    self.overlap_fraction
                ),
            });
        }

        if !(confidence::MIN..=confidence::MAX).contains(&self.min_confidence) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "min_confidence must be between {} and {}, got {}",
                    confidence::MIN,
                    confidence::MAX,
                    self.min_confidence
                ),
            });
        }

        if self.sample_rate == 0 {
            return Err(Error::InvalidConfiguration {
                message: "sample_rate must be positive".to_string(),
            });
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                    self.batch_size
                ),
            });
        }

        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let step = (self.window_samples() as f64 * f64::from(1.0 - self.overlap_fraction)).round()
            as usize;
        if step == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "overlap_fraction {} leaves no forward step at this window size",
                    self.overlap_fraction
                ),
            });
        }

        if let Some(lat) = self.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            return Err(Error::InvalidConfiguration {
                message: format!("latitude must be -90.0 to 90.0, got {lat}"),
            });
        }

        if let Some(lon) = self.longitude
            && !(-180.0..=180.0).contains(&lon)
        {
            return Err(Error::InvalidConfiguration {
                message: format!("longitude must be -180.0 to 180.0, got {lon}"),
            });
        }

        Ok(())
    }

    /// Location/date hint for the inference adapter, when coordinates are set.
    pub fn location_hint(&self) -> Option<LocationHint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(LocationHint {
                latitude,
                longitude,
                date: self.date,
            }),
            _ => None,
        }
    }
}

/// Geographic and seasonal context passed through to the inference adapter.
///
/// Models that do not condition on location treat this as a no-op.
#[derive(Debug, Clone, Copy)]
pub struct LocationHint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reference date.
    pub date: Option<NaiveDate>,
}

/// Get the full path to the config file.
///
/// - Linux: `~/.config/chirp/config.toml`
/// - macOS: `~/Library/Application Support/chirp/config.toml`
/// - Windows: `%APPDATA%\chirp\config.toml`
pub fn config_file_path() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or(Error::ConfigDirNotFound)
}

/// Load configuration from a TOML file.
///
/// Returns default config if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<AnalysisConfig> {
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load configuration from the default platform-specific path.
///
/// Returns default config if no config file exists.
pub fn load_default_config() -> Result<AnalysisConfig> {
    config_file_path().map_or_else(|_| Ok(AnalysisConfig::default()), |p| load_config_file(&p))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_seconds, 5.0);
        assert_eq!(config.sample_rate, 32_000);
        assert_eq!(config.min_confidence, 0.1);
        assert_eq!(config.window_samples(), 160_000);
    }

    #[test]
    fn test_validate_rejects_overlap_of_one() {
        let config = AnalysisConfig {
            overlap_fraction: 1.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nonpositive_window() {
        let config = AnalysisConfig {
            window_seconds: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            window_seconds: -3.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let config = AnalysisConfig {
            min_confidence: 1.5,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_coordinates() {
        let config = AnalysisConfig {
            latitude: Some(100.0),
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            longitude: Some(-200.0),
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_location_hint_requires_both_coordinates() {
        let mut config = AnalysisConfig {
            latitude: Some(60.17),
            ..AnalysisConfig::default()
        };
        assert!(config.location_hint().is_none());

        config.longitude = Some(24.94);
        let hint = config.location_hint().unwrap();
        assert_eq!(hint.latitude, 60.17);
    }

    #[test]
    fn test_load_config_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "min_confidence = 0.25\noverlap_fraction = 0.5").unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.min_confidence, 0.25);
        assert_eq!(config.overlap_fraction, 0.5);
        // Unspecified settings keep their defaults.
        assert_eq!(config.sample_rate, 32_000);
    }

    #[test]
    fn test_load_nonexistent_file_returns_default() {
        let config = load_config_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.batch_size, 8);
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();
        assert!(load_config_file(file.path()).is_err());
    }
}
