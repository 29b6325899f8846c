//! Signal windowing with overlap support.

use crate::error::{Error, Result};

/// A fixed-length audio window with its time offsets.
#[derive(Debug, Clone)]
pub struct Window {
    /// Audio samples for this window, always exactly the window length.
    pub samples: Vec<f32>,
    /// Start offset in seconds from the beginning of the signal.
    pub start_secs: f32,
    /// End offset in seconds from the beginning of the signal.
    pub end_secs: f32,
}

/// Slice a mono signal into fixed-length windows.
///
/// A signal shorter than one window is right-padded with zeros so that any
/// non-empty input yields at least one window. The trailing partial window
/// is dropped rather than padded: only the initial pad guarantees minimum
/// coverage, and a truncated tail would tie detections to a span the
/// classifier never saw in full.
///
/// # Arguments
///
/// * `samples` - Mono signal to slice
/// * `sample_rate` - Sample rate in Hz
/// * `window_seconds` - Window length in seconds
/// * `overlap_fraction` - Fraction of each window shared with the next, in `[0, 1)`
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] when the rate, window length, or
/// overlap would produce a zero-length window or a non-positive step.
pub fn segment(
    samples: &[f32],
    sample_rate: u32,
    window_seconds: f32,
    overlap_fraction: f32,
) -> Result<Vec<Window>> {
    if sample_rate == 0 {
        return Err(Error::InvalidConfiguration {
            message: "sample_rate must be positive".to_string(),
        });
    }
    if !window_seconds.is_finite() || window_seconds <= 0.0 {
        return Err(Error::InvalidConfiguration {
            message: format!("window_seconds must be positive, got {window_seconds}"),
        });
    }
    if !(0.0..1.0).contains(&overlap_fraction) {
        return Err(Error::InvalidConfiguration {
            message: format!("overlap_fraction must be in [0, 1), got {overlap_fraction}"),
        });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let window_samples = (f64::from(window_seconds) * f64::from(sample_rate)).round() as usize;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let step_samples =
        (window_samples as f64 * f64::from(1.0 - overlap_fraction)).round() as usize;

    if window_samples == 0 || step_samples == 0 {
        return Err(Error::InvalidConfiguration {
            message: format!(
                "window of {window_seconds}s at {sample_rate} Hz with overlap {overlap_fraction} leaves no forward step"
            ),
        });
    }

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    // Right-pad a short signal with silence up to exactly one window.
    let padded;
    let signal = if samples.len() < window_samples {
        padded = {
            let mut buf = samples.to_vec();
            buf.resize(window_samples, 0.0);
            buf
        };
        padded.as_slice()
    } else {
        samples
    };

    let mut windows = Vec::with_capacity((signal.len() - window_samples) / step_samples + 1);
    let mut start = 0;
    while start + window_samples <= signal.len() {
        let end = start + window_samples;
        #[allow(clippy::cast_precision_loss)]
        windows.push(Window {
            samples: signal[start..end].to_vec(),
            start_secs: start as f32 / sample_rate as f32,
            end_secs: end as f32 / sample_rate as f32,
        });
        start += step_samples;
    }

    Ok(windows)
}
