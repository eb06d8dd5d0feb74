//! Shared test doubles for the parley-audio integration tests.
//!
//! `MockOutputs` stands in for the audio device: it records every context
//! and source it hands out and keeps each source's completion sender so a
//! test can finish playback on demand.

// Not every test file uses every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_audio::PlaybackEvent;
use parley_core::{
    DecodedAudioBuffer, EncodedAudioPayload, EndedSender, OutputContext, OutputError,
    OutputFactory, PcmFormat, SourceNode, SpeechSynthesizer, StopError, SynthesisError,
    SynthesizedSpeech,
};
use tokio::sync::{Notify, mpsc};

/// Four mono frames: 0.5, 0.5, -0.5, -0.5.
pub const SHORT_PAYLOAD: &str = "AEAAQADAAMA=";

// ── Output device double ───────────────────────────────────────────

#[derive(Default)]
struct OutputLog {
    opened: usize,
    closed: usize,
    started: usize,
    stopped: usize,
    frames: Vec<usize>,
    ended: Vec<Option<EndedSender>>,
    contexts: Vec<Arc<AtomicBool>>,
}

#[derive(Clone, Default)]
pub struct MockOutputs {
    log: Arc<Mutex<OutputLog>>,
    fail_open: bool,
}

impl MockOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose every `open` fails as if no device were present.
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.log.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.log.lock().unwrap().closed
    }

    pub fn started(&self) -> usize {
        self.log.lock().unwrap().started
    }

    pub fn stopped(&self) -> usize {
        self.log.lock().unwrap().stopped
    }

    /// Frame counts of every buffer started, in order.
    pub fn frames(&self) -> Vec<usize> {
        self.log.lock().unwrap().frames.clone()
    }

    /// Fire the completion of source `index`. Returns false if it was
    /// already fired or the receiver is gone.
    pub fn finish(&self, index: usize) -> bool {
        let sender = self
            .log
            .lock()
            .unwrap()
            .ended
            .get_mut(index)
            .and_then(Option::take);
        sender.is_some_and(|tx| tx.send(()).is_ok())
    }

    pub fn finish_latest(&self) -> bool {
        let latest = self.log.lock().unwrap().ended.len().checked_sub(1);
        latest.is_some_and(|index| self.finish(index))
    }

    /// Mark the most recent context as closed by the device.
    pub fn lose_device(&self) {
        if let Some(flag) = self.log.lock().unwrap().contexts.last() {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

impl OutputFactory for MockOutputs {
    fn open(&self, _format: PcmFormat) -> Result<Box<dyn OutputContext>, OutputError> {
        if self.fail_open {
            return Err(OutputError::Unavailable("no device".into()));
        }
        let closed = Arc::new(AtomicBool::new(false));
        let mut log = self.log.lock().unwrap();
        log.opened += 1;
        log.contexts.push(Arc::clone(&closed));
        Ok(Box::new(MockContext {
            log: Arc::clone(&self.log),
            closed,
        }))
    }
}

struct MockContext {
    log: Arc<Mutex<OutputLog>>,
    closed: Arc<AtomicBool>,
}

impl OutputContext for MockContext {
    fn start(
        &mut self,
        buffer: DecodedAudioBuffer,
        on_ended: EndedSender,
    ) -> Result<Box<dyn SourceNode>, OutputError> {
        if self.is_closed() {
            return Err(OutputError::Closed);
        }
        let mut log = self.log.lock().unwrap();
        log.started += 1;
        log.frames.push(buffer.frame_count());
        log.ended.push(Some(on_ended));
        Ok(Box::new(MockSource {
            log: Arc::clone(&self.log),
            stopped: false,
        }))
    }

    fn close(&mut self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.log.lock().unwrap().closed += 1;
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct MockSource {
    log: Arc<Mutex<OutputLog>>,
    stopped: bool,
}

impl SourceNode for MockSource {
    fn stop(&mut self) -> Result<(), StopError> {
        if self.stopped {
            return Err(StopError::AlreadyStopped);
        }
        self.stopped = true;
        self.log.lock().unwrap().stopped += 1;
        Ok(())
    }
}

// ── Synthesizer doubles ────────────────────────────────────────────

/// Returns the same short payload for every request.
pub struct CannedSynth;

#[async_trait]
impl SpeechSynthesizer for CannedSynth {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &str,
    ) -> Result<SynthesizedSpeech, SynthesisError> {
        Ok(short_speech())
    }
}

/// Holds every request until the gate is opened.
pub struct GatedSynth {
    pub gate: Arc<Notify>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl GatedSynth {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GatedSynth {
    async fn synthesize(
        &self,
        text: &str,
        _voice: &str,
    ) -> Result<SynthesizedSpeech, SynthesisError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.gate.notified().await;
        Ok(short_speech())
    }
}

pub fn short_speech() -> SynthesizedSpeech {
    SynthesizedSpeech::audio(
        EncodedAudioPayload::new(SHORT_PAYLOAD),
        PcmFormat::default(),
    )
}

// ── Helpers ────────────────────────────────────────────────────────

/// Drain all pending events from the event receiver.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<PlaybackEvent>) -> Vec<PlaybackEvent> {
    let mut events = Vec::new();
    while let Ok(e) = rx.try_recv() {
        events.push(e);
    }
    events
}

/// Let spawned completion watchers run.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
