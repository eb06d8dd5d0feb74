//! Playback controller — the `Idle → Loading → Playing` state machine.
//!
//! Owns the lazily opened output context and at most one playback session.
//! Every session carries a generation number; completion notifications are
//! only honoured while the session that produced them is still current.

use std::sync::{Arc, Mutex, Weak};

use parley_core::{
    EncodedAudioPayload, OutputContext, OutputFactory, PcmFormat, SourceNode, SpeechSynthesizer,
    StopError, VoiceCatalog,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::decode::decode_with_format;
use crate::error::{GENERIC_FAILURE_MESSAGE, PlaybackError};
use crate::util::lock;

// ── Playback state machine ─────────────────────────────────────────

/// Current state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing requested, nothing playing.
    #[default]
    Idle,

    /// Waiting for speech to be synthesized and decoded.
    Loading,

    /// A session is playing.
    Playing,
}

impl PlaybackState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a play request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A new session is playing.
    Started,
    /// The request arrived while playing and stopped the session instead.
    Stopped,
    /// A request was already loading (or the controller is disposed).
    Ignored,
    /// The controller was disposed while the request was in flight.
    Discarded,
}

// ── Events emitted by the controller ───────────────────────────────

/// Events emitted to the UI / application layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Controller state changed.
    StateChanged(PlaybackState),

    /// A session started playing.
    Started {
        frames: usize,
        sample_rate: u32,
    },

    /// A session ended. `interrupted` is true when it was stopped early.
    Finished { interrupted: bool },

    /// A play attempt failed. Carries the user-facing message.
    Error(String),
}

// ── Configuration ──────────────────────────────────────────────────

/// Configuration for the playback controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Format the output context is opened with.
    pub format: PcmFormat,

    /// Message recorded and emitted for every failed play attempt.
    pub failure_message: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            format: PcmFormat::default(),
            failure_message: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

// ── Shared state ───────────────────────────────────────────────────

struct Session {
    generation: u64,
    source: Box<dyn SourceNode>,
    frames: usize,
}

struct Inner {
    state: PlaybackState,
    session: Option<Session>,
    output: Option<Box<dyn OutputContext>>,
    next_generation: u64,
    last_error: Option<String>,
    disposed: bool,
    selected_voice: String,
}

/// State reachable from completion watchers as well as the controller.
struct Shared {
    inner: Mutex<Inner>,
    event_tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl Shared {
    /// Transition to a new state and emit a state-change event.
    fn transition(&self, inner: &mut Inner, next: PlaybackState) {
        if inner.state != next {
            tracing::debug!(old = %inner.state, new = %next, "Playback state transition");
            inner.state = next;
            self.emit(PlaybackEvent::StateChanged(next));
        }
    }

    /// Best-effort: a dropped receiver is logged and otherwise ignored.
    fn emit(&self, event: PlaybackEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Playback event receiver dropped");
        }
    }

    /// Apply a natural-end notification for `generation`.
    fn complete(&self, generation: u64) {
        let mut inner = lock(&self.inner);
        let current = inner.session.as_ref().map(|s| s.generation);
        if inner.disposed || current != Some(generation) {
            tracing::debug!(generation, ?current, "Ignoring completion from stale session");
            return;
        }

        if let Some(session) = inner.session.take() {
            tracing::debug!(
                generation,
                frames = session.frames,
                "Playback session finished"
            );
        }
        self.emit(PlaybackEvent::Finished { interrupted: false });
        self.transition(&mut inner, PlaybackState::Idle);
    }
}

enum Gate {
    Proceed,
    Ignore,
    Toggle,
}

/// Returns the controller to `Idle` if a `play` future is dropped while its
/// speech request is still in flight.
struct LoadingGuard {
    shared: Weak<Shared>,
    armed: bool,
}

impl LoadingGuard {
    fn arm(shared: &Arc<Shared>) -> Self {
        Self {
            shared: Arc::downgrade(shared),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let mut inner = lock(&shared.inner);
        if inner.disposed || inner.state != PlaybackState::Loading {
            return;
        }
        tracing::debug!("Speech request abandoned; returning to idle");
        shared.transition(&mut inner, PlaybackState::Idle);
    }
}

// ── Controller ─────────────────────────────────────────────────────

/// Plays synthesized speech, one session at a time.
///
/// Create with [`PlaybackController::new`], which also returns the event
/// receiver. Dropping the controller disposes it.
pub struct PlaybackController {
    shared: Arc<Shared>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    outputs: Arc<dyn OutputFactory>,
    catalog: VoiceCatalog,
    config: ControllerConfig,
}

impl PlaybackController {
    /// Create a new controller using the built-in voice catalog.
    ///
    /// Returns the controller and a receiver for [`PlaybackEvent`]s.
    #[must_use]
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        outputs: Arc<dyn OutputFactory>,
        config: ControllerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let catalog = VoiceCatalog::builtin();
        let selected_voice = catalog
            .first()
            .map(|voice| voice.name.clone())
            .unwrap_or_default();

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                state: PlaybackState::Idle,
                session: None,
                output: None,
                next_generation: 1,
                last_error: None,
                disposed: false,
                selected_voice,
            }),
            event_tx,
        });

        let controller = Self {
            shared,
            synthesizer,
            outputs,
            catalog,
            config,
        };
        (controller, event_rx)
    }

    /// Replace the voice catalog. The selection moves to its first voice.
    #[must_use]
    pub fn with_catalog(mut self, catalog: VoiceCatalog) -> Self {
        let first = catalog
            .first()
            .map(|voice| voice.name.clone())
            .unwrap_or_default();
        lock(&self.shared.inner).selected_voice = first;
        self.catalog = catalog;
        self
    }

    // ── Play / stop ────────────────────────────────────────────────

    /// Synthesize `text` with `voice` and play it.
    ///
    /// While loading, further requests are ignored. While playing, a request
    /// stops the current session instead of starting a new one.
    pub async fn play(&self, text: &str, voice: &str) -> Result<PlayOutcome, PlaybackError> {
        match self.begin_loading() {
            Gate::Proceed => {}
            Gate::Ignore => return Ok(PlayOutcome::Ignored),
            Gate::Toggle => {
                self.stop();
                return Ok(PlayOutcome::Stopped);
            }
        }

        let guard = LoadingGuard::arm(&self.shared);
        tracing::debug!(voice, chars = text.chars().count(), "Requesting speech");
        let result = self.synthesizer.synthesize(text, voice).await;
        guard.disarm();

        if self.is_disposed() {
            tracing::debug!("Controller disposed during synthesis; discarding result");
            return Ok(PlayOutcome::Discarded);
        }

        let speech = result.map_err(|e| self.fail(e.into()))?;
        let Some(payload) = speech.payload else {
            return Err(self.fail(PlaybackError::NoAudioReturned));
        };
        self.start_payload(&payload, speech.format)
    }

    /// Play a payload that is already in hand, skipping synthesis.
    pub fn play_payload(
        &self,
        payload: &EncodedAudioPayload,
        format: PcmFormat,
    ) -> Result<PlayOutcome, PlaybackError> {
        match self.begin_loading() {
            Gate::Proceed => self.start_payload(payload, format),
            Gate::Ignore => Ok(PlayOutcome::Ignored),
            Gate::Toggle => {
                self.stop();
                Ok(PlayOutcome::Stopped)
            }
        }
    }

    /// [`play`](Self::play) with the currently selected voice.
    pub async fn play_selected(&self, text: &str) -> Result<PlayOutcome, PlaybackError> {
        let voice = self.selected_voice();
        self.play(text, &voice).await
    }

    /// Stop the current session. A no-op unless playing.
    pub fn stop(&self) {
        let mut inner = lock(&self.shared.inner);
        if inner.state != PlaybackState::Playing {
            return;
        }
        if let Some(session) = inner.session.take() {
            halt(session);
            self.shared.emit(PlaybackEvent::Finished { interrupted: true });
        }
        self.shared.transition(&mut inner, PlaybackState::Idle);
    }

    /// Stop playback and release the output device. Idempotent.
    ///
    /// A request still loading when this is called is discarded on arrival.
    pub fn dispose(&self) {
        let mut inner = lock(&self.shared.inner);
        if inner.disposed {
            return;
        }
        inner.disposed = true;

        if let Some(session) = inner.session.take() {
            halt(session);
            self.shared.emit(PlaybackEvent::Finished { interrupted: true });
        }
        if let Some(mut output) = inner.output.take() {
            output.close();
        }
        self.shared.transition(&mut inner, PlaybackState::Idle);
        tracing::info!("Playback controller disposed");
    }

    // ── Voice selection ────────────────────────────────────────────

    pub const fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// The voice [`play_selected`](Self::play_selected) will use.
    ///
    /// A selection missing from the catalog resolves to its first voice.
    pub fn selected_voice(&self) -> String {
        let selected = lock(&self.shared.inner).selected_voice.clone();
        self.catalog
            .resolve(&selected)
            .map_or(selected, |voice| voice.name.clone())
    }

    /// Change the selected voice.
    ///
    /// Returns `Ok(false)` without changing anything while loading or
    /// playing.
    pub fn select_voice(&self, name: &str) -> Result<bool, PlaybackError> {
        if self.catalog.get(name).is_none() {
            return Err(PlaybackError::UnknownVoice(name.to_string()));
        }

        let mut inner = lock(&self.shared.inner);
        if inner.state != PlaybackState::Idle {
            tracing::debug!(voice = name, state = %inner.state, "Voice change refused while busy");
            return Ok(false);
        }
        inner.selected_voice = name.to_string();
        tracing::debug!(voice = name, "Voice selected");
        Ok(true)
    }

    // ── Queries ────────────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        lock(&self.shared.inner).state
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    pub fn is_loading(&self) -> bool {
        self.state() == PlaybackState::Loading
    }

    /// User-facing message from the most recent failed attempt.
    ///
    /// Cleared when the next attempt begins.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.shared.inner).last_error.clone()
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.shared.inner).disposed
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn begin_loading(&self) -> Gate {
        let mut inner = lock(&self.shared.inner);
        if inner.disposed {
            return Gate::Ignore;
        }
        match inner.state {
            PlaybackState::Loading => Gate::Ignore,
            PlaybackState::Playing => Gate::Toggle,
            PlaybackState::Idle => {
                inner.last_error = None;
                self.shared.transition(&mut inner, PlaybackState::Loading);
                Gate::Proceed
            }
        }
    }

    /// Decode `payload` and start a session. Expects `Loading`.
    fn start_payload(
        &self,
        payload: &EncodedAudioPayload,
        format: PcmFormat,
    ) -> Result<PlayOutcome, PlaybackError> {
        if payload.is_empty() {
            return Err(self.fail(PlaybackError::NoAudioReturned));
        }
        let buffer = decode_with_format(payload, format).map_err(|e| self.fail(e.into()))?;
        if buffer.is_empty() {
            return Err(self.fail(PlaybackError::NoAudioReturned));
        }

        let frames = buffer.frame_count();
        let sample_rate = buffer.sample_rate();
        let (ended_tx, ended_rx) = oneshot::channel();

        let mut inner = lock(&self.shared.inner);
        if inner.disposed {
            return Ok(PlayOutcome::Discarded);
        }

        let started = self
            .ensure_output(&mut inner)
            .and_then(|output| output.start(buffer, ended_tx));
        let source = match started {
            Ok(source) => source,
            Err(e) => return Err(self.fail_locked(&mut inner, e.into())),
        };

        let generation = inner.next_generation;
        inner.next_generation += 1;
        inner.session = Some(Session {
            generation,
            source,
            frames,
        });
        self.shared.emit(PlaybackEvent::Started {
            frames,
            sample_rate,
        });
        self.shared.transition(&mut inner, PlaybackState::Playing);
        drop(inner);

        tracing::debug!(generation, frames, sample_rate, "Playback session started");
        self.watch_completion(generation, ended_rx);
        Ok(PlayOutcome::Started)
    }

    /// The output context, opening a new one if none exists or the last one
    /// was closed.
    fn ensure_output<'a>(
        &self,
        inner: &'a mut Inner,
    ) -> Result<&'a mut Box<dyn OutputContext>, parley_core::OutputError> {
        if inner.output.as_ref().is_some_and(|output| output.is_closed()) {
            tracing::debug!("Output context closed; reopening");
            inner.output = None;
        }
        if inner.output.is_none() {
            inner.output = Some(self.outputs.open(self.config.format)?);
        }
        inner
            .output
            .as_mut()
            .ok_or(parley_core::OutputError::Closed)
    }

    fn watch_completion(&self, generation: u64, ended: oneshot::Receiver<()>) {
        let shared = Arc::downgrade(&self.shared);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if ended.await.is_ok() {
                    deliver_completion(&shared, generation);
                }
            });
            return;
        }

        let spawned = std::thread::Builder::new()
            .name("parley-completion".into())
            .spawn(move || {
                if ended.blocking_recv().is_ok() {
                    deliver_completion(&shared, generation);
                }
            });
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "Failed to spawn completion watcher");
        }
    }

    fn fail(&self, err: PlaybackError) -> PlaybackError {
        let mut inner = lock(&self.shared.inner);
        self.fail_locked(&mut inner, err)
    }

    fn fail_locked(&self, inner: &mut Inner, err: PlaybackError) -> PlaybackError {
        tracing::error!(error = %err, "Speech playback failed");
        inner.last_error = Some(self.config.failure_message.clone());
        self.shared
            .emit(PlaybackEvent::Error(self.config.failure_message.clone()));
        self.shared.transition(inner, PlaybackState::Idle);
        err
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn deliver_completion(shared: &Weak<Shared>, generation: u64) {
    if let Some(shared) = shared.upgrade() {
        shared.complete(generation);
    }
}

fn halt(mut session: Session) {
    match session.source.stop() {
        Ok(()) => tracing::debug!(generation = session.generation, "Playback session stopped"),
        Err(StopError::AlreadyStopped) => {
            tracing::debug!(generation = session.generation, "Source was already stopped");
        }
    }
}
