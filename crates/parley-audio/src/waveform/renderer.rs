//! Frame renderer — draws one waveform frame onto a [`DrawingSurface`].

use parley_core::{DrawingSurface, LineCap, LineJoin, Rgb, StrokeStyle};

use super::palette::{COLOR_CYCLE_RATE, color_at};
use super::synth::{curve_points, depth_offset, primary_offset};

/// Phase advanced per playing frame.
pub const PHASE_STEP: f64 = 0.15;

/// Animation state carried from frame to frame.
///
/// The phase only moves while playing and is never reset, so a new
/// playback picks up where the last one froze.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderState {
    pub phase: f64,
}

impl RenderState {
    pub const fn new(phase: f64) -> Self {
        Self { phase }
    }

    /// Position in the palette cycle.
    pub fn color_position(&self) -> f64 {
        self.phase * COLOR_CYCLE_RATE
    }

    /// Current cycling color.
    pub fn color(&self) -> Rgb {
        color_at(self.phase)
    }
}

/// What the caller should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule another frame.
    Continue,
    /// The frame was static; stop scheduling.
    Halt,
}

/// Stroke parameters for the three lines the renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformConfig {
    pub phase_step: f64,
    pub idle_width: f64,
    pub idle_alpha: f64,
    pub primary_width: f64,
    pub primary_alpha: f64,
    pub depth_width: f64,
    pub depth_alpha: f64,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            phase_step: PHASE_STEP,
            idle_width: 2.0,
            idle_alpha: 0.2,
            primary_width: 2.0,
            primary_alpha: 0.8,
            depth_width: 1.0,
            depth_alpha: 0.3,
        }
    }
}

/// Draws the synthetic waveform.
///
/// Idle frames are a single flat line in the caller's base color. Playing
/// frames advance the phase and draw two tapered curves in the cycling
/// palette color.
#[derive(Debug, Clone, Default)]
pub struct WaveformRenderer {
    state: RenderState,
    config: WaveformConfig,
}

impl WaveformRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WaveformConfig) -> Self {
        Self {
            state: RenderState::default(),
            config,
        }
    }

    /// Start from an existing phase instead of zero.
    #[must_use]
    pub const fn with_phase(mut self, phase: f64) -> Self {
        self.state.phase = phase;
        self
    }

    pub const fn state(&self) -> RenderState {
        self.state
    }

    pub const fn config(&self) -> &WaveformConfig {
        &self.config
    }

    /// Size the backing store for the surface's pixel density and scale the
    /// transform so drawing stays in display units.
    ///
    /// A ratio that is not a positive finite number is treated as 1.
    pub fn resize<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        let ratio = surface.device_pixel_ratio();
        let ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        let (width, height) = surface.display_size();
        surface.set_backing_size(backing_dimension(width, ratio), backing_dimension(height, ratio));
        surface.scale(ratio, ratio);
        tracing::trace!(width, height, ratio, "Waveform surface resized");
    }

    /// Draw one frame.
    pub fn draw_frame<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        is_playing: bool,
        color: Rgb,
    ) -> FrameOutcome {
        let (width, height) = surface.display_size();
        let center_y = height / 2.0;

        surface.clear_rect(0.0, 0.0, width, height);

        if !is_playing {
            surface.begin_path();
            surface.move_to(0.0, center_y);
            surface.line_to(width, center_y);
            surface.set_stroke(StrokeStyle::new(
                color,
                self.config.idle_width,
                self.config.idle_alpha,
            ));
            surface.stroke();
            return FrameOutcome::Halt;
        }

        self.state.phase += self.config.phase_step;
        let phase = self.state.phase;
        let cycled = color_at(phase);

        stroke_curve(
            surface,
            &curve_points(width, center_y, phase, primary_offset),
            center_y,
            rounded(cycled, self.config.primary_width, self.config.primary_alpha),
        );
        stroke_curve(
            surface,
            &curve_points(width, center_y, phase, depth_offset),
            center_y,
            rounded(cycled, self.config.depth_width, self.config.depth_alpha),
        );

        FrameOutcome::Continue
    }
}

fn rounded(color: Rgb, width: f64, alpha: f64) -> StrokeStyle {
    StrokeStyle::new(color, width, alpha)
        .with_cap(LineCap::Round)
        .with_join(LineJoin::Round)
}

fn stroke_curve<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    points: &[(f64, f64)],
    center_y: f64,
    style: StrokeStyle,
) {
    surface.begin_path();
    surface.move_to(0.0, center_y);
    for &(x, y) in points {
        surface.line_to(x, y);
    }
    surface.set_stroke(style);
    surface.stroke();
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_dimension(size: f64, ratio: f64) -> u32 {
    let scaled = size * ratio;
    if scaled.is_finite() && scaled > 0.0 {
        scaled.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
