//! Batch orchestration over input files.

use crate::config::AnalysisConfig;
use crate::detection::Detection;
use crate::error::Result;
use crate::inference::Classifier;
use crate::labels::LabelCatalog;
use crate::pipeline::analyze_file;
use crate::progress;
use std::path::PathBuf;
use tracing::{error, info};

/// Outcome of a batch run.
///
/// Detections are ordered by input file, then window start time, then class
/// index. Failed files contribute zero detections and are counted here; the
/// reasons appear in the log.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// All detections, in (file, time, class) order.
    pub detections: Vec<Detection>,
    /// Number of files analyzed successfully.
    pub files_processed: usize,
    /// Number of files that failed and were skipped.
    pub files_failed: usize,
}

/// Analyze a batch of audio files in order.
///
/// The configuration is validated before any file is touched. A failing
/// file is logged and skipped; a single bad file never aborts the batch.
/// Empty input yields an empty report.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidConfiguration`] when the configuration is
/// rejected up front. Per-file errors are absorbed into the report.
pub fn run_batch(
    files: &[PathBuf],
    classifier: &dyn Classifier,
    catalog: &LabelCatalog,
    config: &AnalysisConfig,
    progress_enabled: bool,
) -> Result<BatchReport> {
    config.validate()?;

    let bar = progress::create_file_progress(files.len(), progress_enabled);
    let mut report = BatchReport::default();

    for file in files {
        match analyze_file(file, classifier, catalog, config) {
            Ok(mut detections) => {
                report.files_processed += 1;
                report.detections.append(&mut detections);
            }
            Err(e) => {
                error!("Failed to process {}: {e}", file.display());
                report.files_failed += 1;
            }
        }
        progress::inc_progress(bar.as_ref());
    }

    progress::finish_progress(bar, "Complete");

    info!(
        "Complete: {} processed, {} failed, {} total detections",
        report.files_processed,
        report.files_failed,
        report.detections.len()
    );

    Ok(report)
}
