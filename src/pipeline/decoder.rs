//! Raw score decoding into detection records.

use crate::audio::Window;
use crate::detection::Detection;
use crate::labels::LabelCatalog;
use chrono::NaiveDateTime;
use std::path::Path;

/// Sigmoid activation, mapping a raw score to a confidence in (0, 1).
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Decode raw classifier scores into detection records.
///
/// For each window, every class whose squashed confidence reaches
/// `min_confidence` (inclusive) yields one record carrying the window's time
/// bounds and the catalog label at that class index. Class indices are
/// visited in increasing order and window order is preserved, so identical
/// inputs always produce an identical record sequence.
pub fn decode_scores(
    scores: &[Vec<f32>],
    windows: &[Window],
    catalog: &LabelCatalog,
    min_confidence: f32,
    source_file: &Path,
    recorded_at: Option<NaiveDateTime>,
) -> Vec<Detection> {
    debug_assert_eq!(scores.len(), windows.len(), "score/window count mismatch");

    let mut detections = Vec::new();
    for (window, class_scores) in windows.iter().zip(scores) {
        for (index, &raw) in class_scores.iter().enumerate() {
            let confidence = sigmoid(raw);
            if confidence >= min_confidence {
                detections.push(Detection::new(
                    catalog.label_for(index),
                    confidence,
                    window.start_secs,
                    window.end_secs,
                    source_file.to_path_buf(),
                    recorded_at,
                ));
            }
        }
    }

    detections
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn window(start: f32, end: f32) -> Window {
        Window {
            samples: vec![0.0; 8],
            start_secs: start,
            end_secs: end,
        }
    }

    #[test]
    fn test_sigmoid_midpoint_and_tails() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // Raw 0.0 squashes to exactly 0.5; a 0.5 threshold retains it.
        let scores = vec![vec![0.0, -5.0]];
        let windows = vec![window(0.0, 5.0)];
        let catalog = LabelCatalog::indexed(2);

        let detections = decode_scores(
            &scores,
            &windows,
            &catalog,
            0.5,
            Path::new("a.wav"),
            None,
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].confidence, 0.5);
        assert_eq!(detections[0].species, "0");
    }

    #[test]
    fn test_silent_window_contributes_no_records() {
        let scores = vec![vec![-10.0, -10.0], vec![5.0, -10.0]];
        let windows = vec![window(0.0, 5.0), window(5.0, 10.0)];
        let catalog = LabelCatalog::indexed(2);

        let detections = decode_scores(
            &scores,
            &windows,
            &catalog,
            0.5,
            Path::new("a.wav"),
            None,
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].start_time, 5.0);
    }

    #[test]
    fn test_ordering_by_window_then_class_index() {
        let scores = vec![vec![3.0, 3.0], vec![3.0, 3.0]];
        let windows = vec![window(0.0, 5.0), window(5.0, 10.0)];
        let catalog =
            LabelCatalog::from_labels(vec!["amerob".to_string(), "norcar".to_string()]);

        let detections = decode_scores(
            &scores,
            &windows,
            &catalog,
            0.1,
            Path::new("a.wav"),
            None,
        );
        let order: Vec<(String, f32)> = detections
            .iter()
            .map(|d| (d.species.clone(), d.start_time))
            .collect();
        assert_eq!(
            order,
            vec![
                ("amerob".to_string(), 0.0),
                ("norcar".to_string(), 0.0),
                ("amerob".to_string(), 5.0),
                ("norcar".to_string(), 5.0),
            ]
        );
    }

    #[test]
    fn test_class_beyond_catalog_uses_index_label() {
        let scores = vec![vec![-10.0, 4.0]];
        let windows = vec![window(0.0, 5.0)];
        let catalog = LabelCatalog::from_labels(vec!["amerob".to_string()]);

        let detections = decode_scores(
            &scores,
            &windows,
            &catalog,
            0.5,
            Path::new("a.wav"),
            None,
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].species, "1");
    }

    #[test]
    fn test_records_carry_source_and_duration() {
        let scores = vec![vec![4.0]];
        let windows = vec![window(2.5, 7.5)];
        let catalog = LabelCatalog::indexed(1);

        let detections = decode_scores(
            &scores,
            &windows,
            &catalog,
            0.1,
            Path::new("SITE01_20240601_053000.wav"),
            None,
        );
        assert_eq!(detections[0].duration, 5.0);
        assert_eq!(
            detections[0].source_file,
            PathBuf::from("SITE01_20240601_053000.wav")
        );
    }
}
