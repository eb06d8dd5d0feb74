//! Dedicated audio output thread — isolates the `!Send` output stream.
//!
//! `rodio::OutputStream` is `!Send` on some platforms (macOS CoreAudio,
//! etc.). Rather than using `unsafe impl Send`, the stream is created and
//! dropped on one OS thread and every operation is routed to it through an
//! [`OutputCommand`].
//!
//! [`AudioThreadHandle`] is the `Send` proxy that an output context holds.
//! Dropping the handle shuts the thread down and joins it, which closes the
//! device.

use std::sync::{Arc, mpsc};
use std::thread;

use parley_core::{DecodedAudioBuffer, OutputError};
use rodio::{OutputStream, Sink};

// ── Commands ───────────────────────────────────────────────────────

/// A command sent from the output context to the audio thread.
enum OutputCommand {
    /// Create a fresh sink and queue one buffer on it.
    Start {
        samples: Vec<f32>,
        channels: u16,
        sample_rate: u32,
        reply: mpsc::Sender<Result<Arc<Sink>, OutputError>>,
    },

    /// Shut down the audio thread, releasing the device.
    Shutdown,
}

// ── Handle (Send proxy) ────────────────────────────────────────────

/// `Send` handle to the dedicated audio output thread.
///
/// Request–reply methods block the caller until the audio thread responds;
/// that is a local channel round trip plus sink creation.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<OutputCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread, open the default output device, and return
    /// the handle.
    ///
    /// Device errors are propagated back through a one-shot init channel.
    pub fn spawn() -> Result<Self, OutputError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<OutputCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), OutputError>>();

        let thread = thread::Builder::new()
            .name("parley-audio".into())
            .spawn(move || Self::run(&cmd_rx, &init_tx))
            .map_err(|e| OutputError::Unavailable(format!("failed to spawn audio thread: {e}")))?;

        // Wait for the audio thread to finish initialisation.
        init_rx
            .recv()
            .map_err(|_| OutputError::Unavailable("audio thread exited during startup".into()))??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Queue `buffer` on a new sink and return it, already playing.
    pub fn start(&self, buffer: &DecodedAudioBuffer) -> Result<Arc<Sink>, OutputError> {
        let channels = u16::try_from(buffer.channel_count())
            .map_err(|_| OutputError::Start("too many channels".to_string()))?;

        let (reply, rx) = mpsc::channel();
        self.cmd_tx
            .send(OutputCommand::Start {
                samples: buffer.interleaved(),
                channels,
                sample_rate: buffer.sample_rate(),
                reply,
            })
            .map_err(|_| OutputError::Closed)?;
        rx.recv().map_err(|_| OutputError::Closed)?
    }

    /// Whether the thread is still expected to be serving commands.
    pub const fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Stop the thread and join it. Idempotent.
    pub fn shutdown(&mut self) {
        // Best-effort: the thread may already be dead.
        let _ = self.cmd_tx.send(OutputCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    // ── Audio thread event loop ────────────────────────────────────

    /// Body of the audio thread. Owns the `OutputStream` for its entire
    /// lifetime; it never crosses a thread boundary.
    fn run(cmd_rx: &mpsc::Receiver<OutputCommand>, init_tx: &mpsc::Sender<Result<(), OutputError>>) {
        let (_stream, stream_handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                let _ = init_tx.send(Err(OutputError::Unavailable(e.to_string())));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            // Caller dropped — nothing to do.
            return;
        }

        tracing::info!("Audio output initialized on default device");

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                OutputCommand::Start {
                    samples,
                    channels,
                    sample_rate,
                    reply,
                } => {
                    let result = Sink::try_new(&stream_handle)
                        .map(|sink| {
                            sink.append(rodio::buffer::SamplesBuffer::new(
                                channels,
                                sample_rate,
                                samples,
                            ));
                            Arc::new(sink)
                        })
                        .map_err(|e| OutputError::Start(e.to_string()));
                    let _ = reply.send(result);
                }

                OutputCommand::Shutdown => break,
            }
        }

        // `_stream` is dropped here, on the audio thread.
        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
