//! Port traits — the seams where adapters plug into the audio core.
//!
//! # Design Rules
//!
//! - Ports never name a concrete backend (no rodio, reqwest or canvas types).
//! - Port errors are coarse; adapters keep their detailed error enums
//!   internal and convert at the boundary.

mod output;
mod surface;
mod synthesizer;

pub use output::{EndedSender, OutputContext, OutputError, OutputFactory, SourceNode, StopError};
pub use surface::{DrawingSurface, LineCap, LineJoin, StrokeStyle};
pub use synthesizer::{SpeechSynthesizer, SynthesisError, SynthesizedSpeech};
