//! Gemini speech client.
//!
//! Sends one `generateContent` request per utterance and returns the inline
//! audio of the first candidate as an encoded PCM payload.

use async_trait::async_trait;
use parley_core::{
    EncodedAudioPayload, PcmFormat, SpeechSynthesizer, SynthesisError, SynthesizedSpeech,
};
use url::Url;

use crate::config::GeminiClientConfig;
use crate::error::GeminiResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{GenerateContentRequest, GenerateContentResponse};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default Gemini client using the reqwest HTTP backend.
pub type DefaultGeminiClient = GeminiTtsClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the Gemini speech endpoint.
///
/// Generic over an HTTP backend for testing. Use [`DefaultGeminiClient`] in
/// production code.
pub struct GeminiTtsClient<B: HttpBackend> {
    backend: B,
    endpoint: Url,
    model: String,
}

impl DefaultGeminiClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be
    /// built. A missing API key is only reported when a request is made.
    pub fn new(config: &GeminiClientConfig) -> GeminiResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        Self::with_backend(config, backend)
    }
}

impl<B: HttpBackend> GeminiTtsClient<B> {
    /// Create a client on top of a custom backend.
    pub(crate) fn with_backend(config: &GeminiClientConfig, backend: B) -> GeminiResult<Self> {
        let endpoint = endpoint_url(&config.base_url, &config.model)?;
        tracing::debug!(%endpoint, "Gemini client configured");
        Ok(Self {
            backend,
            endpoint,
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Request speech for `text` in `voice`.
    ///
    /// A successful response without inline audio yields
    /// [`SynthesizedSpeech::empty`].
    pub async fn generate_speech(&self, text: &str, voice: &str) -> GeminiResult<SynthesizedSpeech> {
        tracing::debug!(
            model = %self.model,
            voice,
            chars = text.chars().count(),
            "Requesting speech from Gemini"
        );

        let request = GenerateContentRequest::speech(text, voice);
        let response: GenerateContentResponse =
            self.backend.post_json(&self.endpoint, &request).await?;

        let Some(audio) = response.first_audio().filter(|audio| !audio.data.is_empty()) else {
            let finish_reason = response
                .candidates
                .first()
                .and_then(|candidate| candidate.finish_reason.as_deref());
            tracing::warn!(
                candidates = response.candidates.len(),
                ?finish_reason,
                "Gemini response carried no audio"
            );
            return Ok(SynthesizedSpeech::empty());
        };

        let format = audio
            .mime_type
            .as_deref()
            .map(PcmFormat::from_mime_type)
            .unwrap_or_default();
        tracing::debug!(
            bytes_b64 = audio.data.len(),
            sample_rate = format.sample_rate,
            "Received speech audio"
        );

        Ok(SynthesizedSpeech::audio(
            EncodedAudioPayload::new(audio.data.clone()),
            format,
        ))
    }
}

#[async_trait]
impl<B: HttpBackend> SpeechSynthesizer for GeminiTtsClient<B> {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
    ) -> Result<SynthesizedSpeech, SynthesisError> {
        self.generate_speech(text, voice).await.map_err(Into::into)
    }
}

/// `{base}/models/{model}:generateContent`
fn endpoint_url(base_url: &str, model: &str) -> GeminiResult<Url> {
    let base = base_url.trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/models/{model}:generateContent"))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeminiError;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    fn client(response: CannedResponse) -> GeminiTtsClient<FakeBackend> {
        GeminiTtsClient::with_backend(&GeminiClientConfig::new(), FakeBackend::new(response))
            .unwrap()
    }

    fn audio_response(mime: &str, data: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {"parts": [{"inlineData": {"mimeType": mime, "data": data}}]},
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_endpoint_url() {
        let url = endpoint_url(
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-2.5-flash-preview-tts",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-tts:generateContent"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            endpoint_url("not a url", "m"),
            Err(GeminiError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_audio_and_format_extracted() {
        let client = client(CannedResponse::ok(audio_response(
            "audio/L16;codec=pcm;rate=16000",
            "AEAAQA==",
        )));

        let speech = client.generate_speech("Hello", "Puck").await.unwrap();

        assert_eq!(speech.payload.unwrap().as_str(), "AEAAQA==");
        assert_eq!(speech.format, PcmFormat::new(16_000, 1));
    }

    #[tokio::test]
    async fn test_request_carries_text_and_voice() {
        let client = client(CannedResponse::ok(audio_response("audio/L16", "AAAA")));

        client.generate_speech("Say hi", "Charon").await.unwrap();

        let requests = client.backend.requests.lock().unwrap();
        let (url, body) = &requests[0];
        assert!(url.ends_with(":generateContent"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Say hi");
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Charon"
        );
    }

    #[test]
    fn test_usable_as_synthesizer_port() {
        let synth: Box<dyn SpeechSynthesizer> = Box::new(client(CannedResponse::ok(
            audio_response("audio/L16;codec=pcm;rate=24000", "AEAAQA=="),
        )));

        let speech = tokio_test::block_on(synth.synthesize("Hello", "Kore")).unwrap();

        assert_eq!(speech.payload.unwrap().as_str(), "AEAAQA==");
        assert_eq!(speech.format, PcmFormat::default());
    }

    #[tokio::test]
    async fn test_audio_after_text_part_is_found() {
        let client = client(CannedResponse::ok(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is your audio"},
                    {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AEAAQA=="}}
                ]}
            }]
        })));

        let speech = client.generate_speech("Hello", "Puck").await.unwrap();

        assert_eq!(speech.payload.unwrap().as_str(), "AEAAQA==");
    }

    #[tokio::test]
    async fn test_missing_audio_is_empty_speech() {
        let client = client(CannedResponse::ok(json!({
            "candidates": [{"content": {"parts": [{"text": "sorry"}]}, "finishReason": "OTHER"}]
        })));

        let speech = client.generate_speech("Hello", "Puck").await.unwrap();

        assert!(speech.payload.is_none());
    }

    #[tokio::test]
    async fn test_missing_mime_type_uses_default_format() {
        let client = client(CannedResponse::ok(json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"data": "AAAA"}}]}}]
        })));

        let speech = client.generate_speech("Hello", "Puck").await.unwrap();

        assert_eq!(speech.format, PcmFormat::default());
    }

    #[tokio::test]
    async fn test_api_error_maps_to_port_error() {
        let client = client(CannedResponse {
            status: 400,
            json: json!({"error": {"code": 400, "message": "Voice not found"}}),
        });

        let err = client.synthesize("Hello", "Nobody").await.unwrap_err();

        assert!(matches!(
            err,
            SynthesisError::Api { status: 400, ref message } if message == "Voice not found"
        ));
    }
}
