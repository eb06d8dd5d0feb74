//! Internal error types for Gemini operations.
//!
//! These errors are internal to `parley-gemini` and are mapped to
//! [`SynthesisError`] at the port boundary.

use parley_core::SynthesisError;
use thiserror::Error;

/// Result type alias for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Errors related to Gemini API operations.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// API request failed with an HTTP error status.
    #[error("Gemini API request failed with status {status}: {message}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// Message from the error body, or the URL when there was none
        message: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from Gemini API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// No API key was configured.
    #[error("No Gemini API key configured")]
    MissingApiKey,

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<GeminiError> for SynthesisError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::ApiRequestFailed { status, message } => Self::Api { status, message },
            GeminiError::InvalidResponse { message } => Self::InvalidResponse(message),
            GeminiError::JsonParse(e) => Self::InvalidResponse(e.to_string()),
            GeminiError::MissingApiKey
            | GeminiError::ClientBuild(_)
            | GeminiError::Network(_)
            | GeminiError::InvalidUrl(_) => Self::Network(err.to_string()),
        }
    }
}
