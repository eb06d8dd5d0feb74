//! Audio output port — a lazily opened output context that plays buffers.
//!
//! The shape follows a browser-style audio graph:
//!
//! ```text
//!   OutputFactory::open ──▶ OutputContext ──start(buffer)──▶ SourceNode
//!                                │                              │
//!                              close()                     stop() / ended
//! ```
//!
//! A context is expensive (it owns a device stream) and is reused across
//! many sources. A source plays exactly one buffer, once.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{DecodedAudioBuffer, PcmFormat};

/// One-shot notification fired when a source plays to its natural end.
///
/// It is never fired after an explicit [`SourceNode::stop`]; in that case
/// the sender is simply dropped.
pub type EndedSender = oneshot::Sender<()>;

/// Errors raised while opening a context or starting a source.
#[derive(Debug, Clone, Error)]
pub enum OutputError {
    /// No output device could be opened.
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),

    /// The context was closed and can no longer start sources.
    #[error("Audio output context is closed")]
    Closed,

    /// The device refused the buffer.
    #[error("Failed to start audio source: {0}")]
    Start(String),
}

/// Raised when stopping a source that already stopped. Expected and harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StopError {
    #[error("audio source already stopped")]
    AlreadyStopped,
}

/// A playing buffer. Dropping it releases the underlying device resources.
pub trait SourceNode: Send {
    /// Halt playback immediately.
    fn stop(&mut self) -> Result<(), StopError>;
}

/// An open output device that can play buffers.
pub trait OutputContext: Send {
    /// Start playing `buffer`. `on_ended` fires when the buffer drains.
    fn start(
        &mut self,
        buffer: DecodedAudioBuffer,
        on_ended: EndedSender,
    ) -> Result<Box<dyn SourceNode>, OutputError>;

    /// Release the device. Idempotent.
    fn close(&mut self);

    /// Whether [`close`](Self::close) has been called (or the device died).
    fn is_closed(&self) -> bool;
}

/// Opens output contexts on demand.
pub trait OutputFactory: Send + Sync {
    fn open(&self, format: PcmFormat) -> Result<Box<dyn OutputContext>, OutputError>;
}
