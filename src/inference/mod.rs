//! Acoustic classifier abstraction.

mod onnx;

pub use onnx::OnnxClassifier;

use crate::error::Result;

/// Capability contract for the acoustic model.
///
/// An implementation accepts a fixed-shape batch of waveform samples and
/// returns per-class real-valued scores. The pipeline assumes nothing else
/// about the model, so a local network, a remote service, or a deterministic
/// test double all substitute freely.
pub trait Classifier: Send + Sync {
    /// Width of each score vector (number of output classes).
    fn num_classes(&self) -> usize;

    /// Run a forward pass over a batch of equal-length segments.
    ///
    /// Returns one raw score vector per segment, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Inference`] when the forward pass fails; the
    /// caller treats this as fatal for the current file only.
    fn classify_batch(&self, segments: &[&[f32]]) -> Result<Vec<Vec<f32>>>;
}
