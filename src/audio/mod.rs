//! Audio processing pipeline.

mod decode;
mod resample;
mod window;

pub use decode::{DecodedAudio, decode_audio_file};
pub use resample::resample;
pub use window::{Window, segment};
