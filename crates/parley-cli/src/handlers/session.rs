//! Shared playback loop for `play` and `speak`.

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use parley_audio::waveform::PALETTE;
use parley_audio::{
    AnimationConfig, ControllerConfig, PlayOutcome, PlaybackController, PlaybackEvent,
    RecordingSurface, RenderState, RodioOutputFactory, Visualizer,
};
use parley_core::{PcmFormat, SpeechSynthesizer};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::CliError;

const SURFACE_WIDTH: f64 = 600.0;
const SURFACE_HEIGHT: f64 = 120.0;
const STATUS_INTERVAL: Duration = Duration::from_millis(200);

/// Build a controller on the default output device.
pub(super) fn controller(
    synthesizer: Arc<dyn SpeechSynthesizer>,
    format: PcmFormat,
) -> (PlaybackController, UnboundedReceiver<PlaybackEvent>) {
    let config = ControllerConfig {
        format,
        ..ControllerConfig::default()
    };
    PlaybackController::new(synthesizer, Arc::new(RodioOutputFactory::new()), config)
}

/// Follow a started session until it ends, animating the waveform and
/// printing its color. Ctrl-C stops playback.
pub(super) async fn follow(
    controller: &PlaybackController,
    events: &mut UnboundedReceiver<PlaybackEvent>,
    outcome: PlayOutcome,
) -> Result<(), CliError> {
    if outcome != PlayOutcome::Started {
        tracing::debug!(?outcome, "Nothing to follow");
        return Ok(());
    }

    let base = PALETTE[0];
    let surface = RecordingSurface::new(SURFACE_WIDTH, SURFACE_HEIGHT);
    let mut visualizer = Visualizer::mount(surface, AnimationConfig::default());
    visualizer.set_inputs(true, base);

    let mut status = tokio::time::interval(STATUS_INTERVAL);
    let result = loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(PlaybackEvent::Started { frames, sample_rate }) => {
                    tracing::info!(frames, sample_rate, "Playing");
                }
                Some(PlaybackEvent::Finished { interrupted }) => {
                    println!();
                    println!("{}", if interrupted { "Stopped." } else { "Done." });
                    break Ok(());
                }
                Some(PlaybackEvent::Error(message)) => {
                    println!();
                    break Err(CliError::Playback(message));
                }
                Some(PlaybackEvent::StateChanged(state)) => {
                    tracing::debug!(%state, "Playback state");
                }
                None => break Ok(()),
            },
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                controller.stop();
            }
            _ = status.tick() => print_status(&visualizer),
        }
    };

    visualizer.set_inputs(false, base);
    visualizer.unmount();
    controller.dispose();
    result
}

fn print_status(visualizer: &Visualizer<RecordingSurface>) {
    let phase = visualizer.phase();
    // Frames are only counted here; drop the recording so it stays small.
    let strokes = visualizer.with_surface(|surface| {
        let count = surface.stroke_count();
        surface.take_ops();
        count
    });

    print!(
        "\r{} phase {phase:>8.2} strokes {strokes:>5}",
        RenderState::new(phase).color().to_hex()
    );
    let _ = std::io::stdout().flush();
}
