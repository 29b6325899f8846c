//! Single file analysis pipeline.

use crate::audio::{decode_audio_file, resample, segment};
use crate::config::AnalysisConfig;
use crate::detection::Detection;
use crate::error::{Error, Result};
use crate::inference::Classifier;
use crate::labels::LabelCatalog;
use crate::pipeline::decode_scores;
use crate::utils::timestamp::recording_start;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analyze a single audio file and return its detections.
///
/// Runs decode, resample, windowing, inference, and score decoding for one
/// file. Errors here are fatal for this file only; the batch orchestrator
/// converts them into zero records and continues.
pub fn analyze_file(
    path: &Path,
    classifier: &dyn Classifier,
    catalog: &LabelCatalog,
    config: &AnalysisConfig,
) -> Result<Vec<Detection>> {
    let started = Instant::now();

    info!("Processing: {}", path.display());

    let recorded_at = recording_start(path);
    if recorded_at.is_none() {
        warn!(
            "No recording timestamp in file name, detections from {} carry no absolute time",
            path.display()
        );
    }

    let decoded = decode_audio_file(path)?;
    debug!(
        "Decoded {:.1}s of audio at {} Hz",
        decoded.duration_secs, decoded.sample_rate
    );

    let samples = if decoded.sample_rate == config.sample_rate {
        decoded.samples
    } else {
        debug!(
            "Resampling from {} Hz to {} Hz...",
            decoded.sample_rate, config.sample_rate
        );
        resample(decoded.samples, decoded.sample_rate, config.sample_rate)?
    };

    let windows = segment(
        &samples,
        config.sample_rate,
        config.window_seconds,
        config.overlap_fraction,
    )?;

    if windows.is_empty() {
        info!("No windows to process (empty audio)");
        return Ok(Vec::new());
    }

    debug!("Running inference on {} windows...", windows.len());
    let mut scores = Vec::with_capacity(windows.len());
    for batch in windows.chunks(config.batch_size) {
        let segments: Vec<&[f32]> = batch.iter().map(|w| w.samples.as_slice()).collect();
        let batch_scores = classifier.classify_batch(&segments)?;

        if batch_scores.len() != segments.len() {
            return Err(Error::Inference {
                reason: format!(
                    "classifier returned {} score vectors for {} segments",
                    batch_scores.len(),
                    segments.len()
                ),
            });
        }

        scores.extend(batch_scores);
    }

    let detections = decode_scores(
        &scores,
        &windows,
        catalog,
        config.min_confidence,
        path,
        recorded_at,
    );

    info!(
        "Found {} detections above {:.1}% confidence in {} windows ({:.2}s)",
        detections.len(),
        config.min_confidence * 100.0,
        windows.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(detections)
}
