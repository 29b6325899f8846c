//! Detection record definitions.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;

/// A single species detection.
///
/// Records are created once by the score decoder and never mutated; the
/// aggregate collection is the sole hand-off surface to reporting code.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// Species label for the detected class.
    pub species: String,
    /// Detection confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Start time in seconds, relative to the start of the source file.
    pub start_time: f32,
    /// End time in seconds, relative to the start of the source file.
    pub end_time: f32,
    /// Detection span in seconds (`end_time - start_time`).
    pub duration: f32,
    /// Path to the source audio file.
    pub source_file: PathBuf,
    /// Recording start time parsed from the file name, if available.
    pub recorded_at: Option<NaiveDateTime>,
}

impl Detection {
    /// Create a detection for a window/class pair.
    pub fn new(
        species: String,
        confidence: f32,
        start_time: f32,
        end_time: f32,
        source_file: PathBuf,
        recorded_at: Option<NaiveDateTime>,
    ) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&confidence),
            "confidence out of range: {confidence}"
        );
        debug_assert!(end_time >= start_time, "window ends before it starts");

        Self {
            species,
            confidence,
            start_time,
            end_time,
            duration: end_time - start_time,
            source_file,
            recorded_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_derived_from_bounds() {
        let detection = Detection::new(
            "amerob".to_string(),
            0.9,
            2.0,
            7.0,
            PathBuf::from("test.wav"),
            None,
        );
        assert_eq!(detection.duration, 5.0);
    }

    #[test]
    fn test_serializes_to_json() {
        let detection = Detection::new(
            "norcar".to_string(),
            0.5,
            0.0,
            5.0,
            PathBuf::from("rec_20240601_053000.wav"),
            None,
        );
        let json = serde_json::to_string(&detection).ok();
        assert!(json.is_some_and(|j| j.contains("norcar") && j.contains("duration")));
    }
}
