//! Animation loop — keeps drawing frames while audio plays.
//!
//! A [`Visualizer`] owns a mounted surface and a renderer. Every input
//! change cancels the running loop, draws one frame right away, and starts
//! a new loop only if that frame asked for more. The renderer is shared
//! across loops, so the phase keeps accumulating between playbacks.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use parley_core::{DrawingSurface, Rgb};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::renderer::{FrameOutcome, WaveformRenderer};
use crate::util::lock;

/// Frame pacing for the animation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    pub frame_interval: Duration,
}

impl AnimationConfig {
    /// Pace at `fps` frames per second. Zero is treated as one.
    pub fn with_fps(fps: u32) -> Self {
        Self {
            frame_interval: Duration::from_secs(1) / fps.max(1),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::with_fps(60)
    }
}

/// A waveform mounted on a surface.
pub struct Visualizer<S> {
    surface: Arc<Mutex<S>>,
    renderer: Arc<Mutex<WaveformRenderer>>,
    config: AnimationConfig,
    cancel_token: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl<S: DrawingSurface + Send + 'static> Visualizer<S> {
    /// Mount onto `surface` with a fresh renderer.
    pub fn mount(surface: S, config: AnimationConfig) -> Self {
        Self::with_renderer(surface, WaveformRenderer::new(), config)
    }

    /// Mount onto `surface`, continuing from an existing renderer.
    pub fn with_renderer(surface: S, renderer: WaveformRenderer, config: AnimationConfig) -> Self {
        let mut surface = surface;
        renderer.resize(&mut surface);
        tracing::debug!(
            interval_ms = config.frame_interval.as_millis(),
            "Waveform visualizer mounted"
        );
        Self {
            surface: Arc::new(Mutex::new(surface)),
            renderer: Arc::new(Mutex::new(renderer)),
            config,
            cancel_token: None,
            task: None,
        }
    }

    /// Apply new inputs: cancel the current loop, redraw, and restart the
    /// loop if the frame is animated.
    ///
    /// Outside a tokio runtime only the immediate frame is drawn.
    pub fn set_inputs(&mut self, is_playing: bool, color: Rgb) {
        self.cancel();

        {
            let mut surface = lock(&self.surface);
            lock(&self.renderer).resize(&mut *surface);
        }
        if render(&self.surface, &self.renderer, is_playing, color) == FrameOutcome::Halt {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime; waveform will not animate");
            return;
        };

        let token = CancellationToken::new();
        let cancel_token = token.clone();
        let surface = Arc::clone(&self.surface);
        let renderer = Arc::clone(&self.renderer);
        let frame_interval = self.config.frame_interval;

        // The frame for these inputs was just drawn; the next one is due a
        // full interval from now.
        let mut ticker = interval_at(Instant::now() + frame_interval, frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.task = Some(handle.spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel_token.cancelled() => break,
                    _ = ticker.tick() => {
                        if render(&surface, &renderer, is_playing, color) == FrameOutcome::Halt {
                            break;
                        }
                    }
                }
            }
            tracing::trace!("Waveform animation loop ended");
        }));
        self.cancel_token = Some(token);
    }

    /// Whether a frame loop is currently scheduled.
    pub fn is_animating(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Current phase of the shared renderer.
    pub fn phase(&self) -> f64 {
        lock(&self.renderer).state().phase
    }

    /// Run `f` with the mounted surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut lock(&self.surface))
    }

    /// Stop animating. The surface stays mounted; later inputs restart it.
    pub fn unmount(&mut self) {
        self.cancel();
        tracing::debug!("Waveform visualizer unmounted");
    }

    fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.task = None;
    }
}

impl<S> Drop for Visualizer<S> {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

fn render<S: DrawingSurface>(
    surface: &Mutex<S>,
    renderer: &Mutex<WaveformRenderer>,
    is_playing: bool,
    color: Rgb,
) -> FrameOutcome {
    let mut surface = lock(surface);
    lock(renderer).draw_frame(&mut *surface, is_playing, color)
}
