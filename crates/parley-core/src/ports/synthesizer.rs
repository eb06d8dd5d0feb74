//! Speech synthesis port — text in, encoded PCM out.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{EncodedAudioPayload, PcmFormat};

/// Result of a synthesis request.
///
/// `payload` is `None` when the service answered successfully but returned
/// no audio; callers treat that as a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedSpeech {
    pub payload: Option<EncodedAudioPayload>,
    pub format: PcmFormat,
}

impl SynthesizedSpeech {
    /// Speech with audio in the given format.
    pub const fn audio(payload: EncodedAudioPayload, format: PcmFormat) -> Self {
        Self {
            payload: Some(payload),
            format,
        }
    }

    /// A successful response that carried no audio.
    pub fn empty() -> Self {
        Self {
            payload: None,
            format: PcmFormat::default(),
        }
    }
}

/// Errors returned by [`SpeechSynthesizer`] implementations.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with an error status.
    #[error("Speech service returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The service answered with something that could not be understood.
    #[error("Invalid response from speech service: {0}")]
    InvalidResponse(String),
}

/// Backend-agnostic text-to-speech call.
///
/// Implementations must be `Send + Sync` so a controller can hold them
/// behind an `Arc` and call them from any task.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the voice identified by `voice`.
    async fn synthesize(&self, text: &str, voice: &str)
    -> Result<SynthesizedSpeech, SynthesisError>;
}
