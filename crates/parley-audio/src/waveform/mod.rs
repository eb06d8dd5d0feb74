//! Waveform visualizer — a synthetic, phase-animated curve.
//!
//! The curve is not derived from the audio signal. It only reacts to the
//! boolean "is playing" input and cycles its color through a fixed palette.
//!
//! - [`palette`] — the four-color cycle and interpolation
//! - [`synth`] — the curve math (envelope, harmonics)
//! - [`renderer`] — one frame onto a [`DrawingSurface`](parley_core::DrawingSurface)
//! - [`animation`] — the frame loop driving the renderer
//! - [`surface`] — an in-memory surface with SVG export

pub mod animation;
pub mod palette;
pub mod renderer;
pub mod surface;
pub mod synth;

pub use animation::{AnimationConfig, Visualizer};
pub use palette::{COLOR_CYCLE_RATE, PALETTE, color_at};
pub use renderer::{FrameOutcome, PHASE_STEP, RenderState, WaveformConfig, WaveformRenderer};
pub use surface::{DrawOp, RecordingSurface, StrokedPath};
pub use synth::SAMPLE_POINTS;
