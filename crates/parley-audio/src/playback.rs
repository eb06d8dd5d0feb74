//! Audio playback module — decoded buffers out through `rodio`.
//!
//! [`RodioOutputFactory`] implements the [`OutputFactory`] port. Each
//! context it opens owns one dedicated audio thread (see
//! [`crate::audio_thread`]); each buffer started on it gets its own sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parley_core::{
    DecodedAudioBuffer, EndedSender, OutputContext, OutputError, OutputFactory, PcmFormat,
    SourceNode, StopError,
};
use rodio::Sink;

use crate::audio_thread::AudioThreadHandle;

/// Opens contexts on the default output device.
#[derive(Debug, Clone, Copy, Default)]
pub struct RodioOutputFactory;

impl RodioOutputFactory {
    pub const fn new() -> Self {
        Self
    }
}

impl OutputFactory for RodioOutputFactory {
    fn open(&self, format: PcmFormat) -> Result<Box<dyn OutputContext>, OutputError> {
        let audio = AudioThreadHandle::spawn()?;
        tracing::debug!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            "Opened audio output context"
        );
        Ok(Box::new(RodioOutputContext {
            audio: Some(audio),
            format,
        }))
    }
}

/// An open output device.
///
/// The `format` is the rate the context was requested at; buffers carry
/// their own rate and rodio resamples as needed.
pub struct RodioOutputContext {
    audio: Option<AudioThreadHandle>,
    format: PcmFormat,
}

impl RodioOutputContext {
    pub const fn format(&self) -> PcmFormat {
        self.format
    }
}

impl OutputContext for RodioOutputContext {
    fn start(
        &mut self,
        buffer: DecodedAudioBuffer,
        on_ended: EndedSender,
    ) -> Result<Box<dyn SourceNode>, OutputError> {
        let audio = self.audio.as_ref().ok_or(OutputError::Closed)?;
        let sink = audio.start(&buffer)?;

        let stopped = Arc::new(AtomicBool::new(false));
        spawn_completion_watcher(Arc::clone(&sink), Arc::clone(&stopped), on_ended);

        tracing::debug!(
            frames = buffer.frame_count(),
            sample_rate = buffer.sample_rate(),
            "Audio playback started"
        );
        Ok(Box::new(RodioSource { sink, stopped }))
    }

    fn close(&mut self) {
        if let Some(mut audio) = self.audio.take() {
            audio.shutdown();
            tracing::debug!("Audio output context closed");
        }
    }

    fn is_closed(&self) -> bool {
        !self.audio.as_ref().is_some_and(AudioThreadHandle::is_running)
    }
}

impl Drop for RodioOutputContext {
    fn drop(&mut self) {
        self.close();
    }
}

/// One buffer playing on its own sink.
struct RodioSource {
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
}

impl SourceNode for RodioSource {
    fn stop(&mut self) -> Result<(), StopError> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Err(StopError::AlreadyStopped);
        }
        self.sink.stop();
        tracing::debug!("Audio playback stopped");
        Ok(())
    }
}

impl Drop for RodioSource {
    fn drop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.sink.stop();
        }
    }
}

/// Block a helper thread until the sink drains, then fire `on_ended`
/// unless the source was stopped first.
///
/// `sleep_until_end()` also returns when `stop()` is called, so the
/// `stopped` flag is what tells the two apart.
fn spawn_completion_watcher(sink: Arc<Sink>, stopped: Arc<AtomicBool>, on_ended: EndedSender) {
    let spawned = std::thread::Builder::new()
        .name("parley-playback-watch".into())
        .spawn(move || {
            sink.sleep_until_end();

            if stopped.swap(true, Ordering::SeqCst) {
                return;
            }

            tracing::debug!("Playback finished naturally");
            let _ = on_ended.send(());
        });

    if let Err(e) = spawned {
        tracing::warn!(error = %e, "Failed to spawn playback watcher; completion will not be reported");
    }
}
