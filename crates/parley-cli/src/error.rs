//! CLI-specific error types and exit codes.

use parley_audio::{DecodeError, PlaybackError};
use parley_core::CatalogError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or input validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Playback failed.
    #[error("{0}")]
    Playback(String),
}

impl CliError {
    /// Map error to an exit code (see sysexits.h).
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Playback(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<PlaybackError> for CliError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::UnknownVoice(_) => Self::Arguments(err.to_string()),
            PlaybackError::NoAudioReturned
            | PlaybackError::Decode(_)
            | PlaybackError::NetworkFailure(_)
            | PlaybackError::OutputResourceUnavailable(_) => {
                Self::Playback(err.user_message().to_string())
            }
        }
    }
}
