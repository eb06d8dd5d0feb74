//! Audio core error types.

use parley_core::{OutputError, SynthesisError};

/// The one message end users see for any failed play attempt.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate speech. Please try again.";

/// Errors raised while turning an encoded payload into a sample buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not valid base64.
    #[error("Audio payload is not valid base64: {0}")]
    InvalidEncoding(String),

    /// The decoded bytes do not split into whole 16-bit frames.
    #[error("{len} bytes do not form whole 16-bit frames for {channels} channel(s)")]
    MalformedFrame { len: usize, channels: u16 },

    /// Sample rate or channel count is unusable.
    #[error("Invalid PCM format: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced by the playback controller.
///
/// The variants keep the internal cause for logs; callers showing the error
/// to a user should use [`PlaybackError::user_message`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlaybackError {
    /// The speech service answered without audio.
    #[error("No audio data received from the speech service")]
    NoAudioReturned,

    /// The speech request failed.
    #[error("Speech request failed: {0}")]
    NetworkFailure(String),

    /// No output device could be opened or it refused the buffer.
    #[error("Audio output unavailable: {0}")]
    OutputResourceUnavailable(String),

    /// The payload could not be decoded.
    #[error("Audio payload could not be decoded: {0}")]
    Decode(#[from] DecodeError),

    /// The requested voice is not in the catalog.
    #[error("Unknown voice: {0}")]
    UnknownVoice(String),
}

impl PlaybackError {
    /// Generic, retry-inviting message for end users.
    pub const fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

impl From<SynthesisError> for PlaybackError {
    fn from(err: SynthesisError) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}

impl From<OutputError> for PlaybackError {
    fn from(err: OutputError) -> Self {
        Self::OutputResourceUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_shares_the_user_message() {
        let errors = [
            PlaybackError::NoAudioReturned,
            PlaybackError::NetworkFailure("timeout".into()),
            PlaybackError::OutputResourceUnavailable("no device".into()),
            PlaybackError::Decode(DecodeError::InvalidEncoding("bad".into())),
        ];
        for err in errors {
            assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn synthesis_errors_map_to_network_failure() {
        let err: PlaybackError = SynthesisError::Api {
            status: 503,
            message: "overloaded".into(),
        }
        .into();
        assert!(matches!(err, PlaybackError::NetworkFailure(msg) if msg.contains("503")));
    }

    #[test]
    fn malformed_frame_message_names_length() {
        let err = DecodeError::MalformedFrame { len: 3, channels: 1 };
        assert!(err.to_string().contains("3 bytes"));
    }
}
