//! Audio resampling using rubato.

use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

/// Frames fed to the resampler per call.
const CHUNK_FRAMES: usize = 1024;

/// Resample a mono signal to the target sample rate.
///
/// Returns the input unchanged if already at the target rate.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples);
    }

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_FRAMES,
        1,
        1,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let frames_per_call = resampler.input_frames_next();
    let mut output = Vec::with_capacity(scaled_len(samples.len(), from_rate, to_rate));

    let mut full_chunks = samples.chunks_exact(frames_per_call);
    for chunk in full_chunks.by_ref() {
        output.extend(process_chunk(&mut resampler, chunk, frames_per_call)?);
    }

    // The final short chunk is zero-padded through the resampler and the
    // output truncated back to the rate-scaled remainder length.
    let remainder = full_chunks.remainder();
    if !remainder.is_empty() {
        let mut tail = remainder.to_vec();
        tail.resize(frames_per_call, 0.0);
        let resampled = process_chunk(&mut resampler, &tail, frames_per_call)?;
        let keep = scaled_len(remainder.len(), from_rate, to_rate).min(resampled.len());
        output.extend_from_slice(&resampled[..keep]);
    }

    Ok(output)
}

/// Push one fixed-size chunk through the resampler.
fn process_chunk(
    resampler: &mut Fft<f32>,
    chunk: &[f32],
    frames: usize,
) -> Result<Vec<f32>> {
    let adapter = SequentialSlice::new(chunk, 1, frames).map_err(|e| Error::Resample {
        reason: format!("failed to wrap input chunk: {e}"),
    })?;

    let resampled = resampler
        .process(&adapter, 0, None)
        .map_err(|e| Error::Resample {
            reason: e.to_string(),
        })?;

    Ok(resampled.take_data())
}

/// Length of `input_len` frames after rate conversion, rounded up.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn scaled_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize
}
