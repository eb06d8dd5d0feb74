#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod audio_thread;
pub mod controller;
pub mod decode;
pub mod error;
pub mod playback;
mod util;
pub mod waveform;

// Re-export key types for convenience
pub use controller::{
    ControllerConfig, PlayOutcome, PlaybackController, PlaybackEvent, PlaybackState,
};
pub use decode::{decode, decode_bytes, decode_with_format};
pub use error::{DecodeError, GENERIC_FAILURE_MESSAGE, PlaybackError};
pub use playback::RodioOutputFactory;
pub use waveform::{
    AnimationConfig, FrameOutcome, RecordingSurface, RenderState, Visualizer, WaveformConfig,
    WaveformRenderer,
};

// Silence unused dev-dependency warnings; mockall is used by tests/ only
#[cfg(test)]
use mockall as _;
