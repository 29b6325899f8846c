//! ONNX-backed classifier using ort.

use crate::config::LocationHint;
use crate::error::{Error, Result};
use crate::inference::Classifier;
use ndarray::Array2;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier backed by a local ONNX session.
///
/// The session is created once at startup and shared read-only for the rest
/// of the run; ort requires `&mut Session` per call, so it sits behind a
/// mutex.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    model_path: PathBuf,
    sample_count: usize,
    score_output: usize,
    num_classes: usize,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("model_path", &self.model_path)
            .field("sample_count", &self.sample_count)
            .field("num_classes", &self.num_classes)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load a model from an ONNX file.
    ///
    /// `sample_count` is the number of samples per segment the model expects;
    /// every batch submitted later is validated against it. An optional
    /// location hint is accepted for parity with location-conditioned models;
    /// plain acoustic models ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelUnavailable`] when the file is missing, the
    /// session cannot be built, or no class-score output can be identified.
    pub fn load(
        model_path: &Path,
        sample_count: usize,
        location: Option<&LocationHint>,
    ) -> Result<Self> {
        if !model_path.exists() {
            return Err(Error::ModelUnavailable {
                path: model_path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }

        let unavailable = |reason: String| Error::ModelUnavailable {
            path: model_path.to_path_buf(),
            reason,
        };

        #[allow(unused_mut)]
        let mut builder = Session::builder().map_err(|e| unavailable(e.to_string()))?;

        #[cfg(feature = "cuda")]
        {
            use ort::execution_providers::CUDAExecutionProvider;
            builder = builder
                .with_execution_providers([CUDAExecutionProvider::default().into()])
                .map_err(|e| unavailable(e.to_string()))?;
        }

        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| unavailable(e.to_string()))?;

        let (score_output, num_classes) = find_score_output(&session)
            .ok_or_else(|| unavailable("no class-score output tensor found".to_string()))?;

        if let Some(hint) = location {
            debug!(
                "Model does not condition on location, ignoring hint ({:.4}, {:.4})",
                hint.latitude, hint.longitude
            );
        }

        info!(
            "Loaded model: {} ({num_classes} classes, {sample_count} samples per segment)",
            model_path.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
            sample_count,
            score_output,
            num_classes,
        })
    }

    /// Expected sample count per segment.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}

/// Identify the class-score output tensor.
///
/// Models may emit embeddings and spectrograms alongside the score head; of
/// the outputs with a static trailing dimension, the widest one is the class
/// head (embedding widths are far below class counts in practice).
fn find_score_output(session: &Session) -> Option<(usize, usize)> {
    session
        .outputs()
        .iter()
        .enumerate()
        .filter_map(|(index, output)| {
            let shape = output.dtype().tensor_shape()?;
            let last = shape.iter().last().copied()?;
            if last <= 1 {
                return None;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let width = last as usize;
            Some((index, width))
        })
        .max_by_key(|&(_, width)| width)
}

impl Classifier for OnnxClassifier {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    #[allow(clippy::significant_drop_tightening)]
    fn classify_batch(&self, segments: &[&[f32]]) -> Result<Vec<Vec<f32>>> {
        if segments.is_empty() {
            return Ok(Vec::new());
        }

        for (i, segment) in segments.iter().enumerate() {
            if segment.len() != self.sample_count {
                return Err(Error::Inference {
                    reason: format!(
                        "segment {i} has {} samples, expected {}",
                        segment.len(),
                        self.sample_count
                    ),
                });
            }
        }

        let batch = segments.len();
        let mut stacked = Vec::with_capacity(batch * self.sample_count);
        for segment in segments {
            stacked.extend_from_slice(segment);
        }

        let input = Array2::from_shape_vec((batch, self.sample_count), stacked)
            .map_err(|e| Error::Inference {
                reason: format!("failed to shape input batch: {e}"),
            })?;
        let value = Value::from_array(input).map_err(|e| Error::Inference {
            reason: format!("failed to create input tensor: {e}"),
        })?;

        // The lock must outlive `outputs`: ort values borrow from the session.
        let mut session = self.session.lock().map_err(|e| Error::Inference {
            reason: format!("session lock poisoned: {e}"),
        })?;

        let outputs = session
            .run(ort::inputs![value.view()])
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        let output_names: Vec<_> = outputs.keys().collect();
        let name = output_names
            .get(self.score_output)
            .ok_or_else(|| Error::Inference {
                reason: format!("missing output tensor at index {}", self.score_output),
            })?;
        let tensor = outputs.get(*name).ok_or_else(|| Error::Inference {
            reason: format!("missing output tensor '{name}'"),
        })?;

        let (_, scores) = tensor
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        if scores.len() != batch * self.num_classes {
            return Err(Error::Inference {
                reason: format!(
                    "expected {} scores for batch of {batch}, got {}",
                    batch * self.num_classes,
                    scores.len()
                ),
            });
        }

        Ok(scores
            .chunks(self.num_classes)
            .map(<[f32]>::to_vec)
            .collect())
    }
}
