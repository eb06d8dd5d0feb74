//! Wire types for the `generateContent` speech call.
//!
//! Only the fields this client reads or writes are modelled; unknown fields
//! in responses are ignored.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

/// Body of `POST /models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// A single-turn audio request for `text` spoken by `voice`.
    pub fn speech(text: &str, voice: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: text.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec![Modality::Audio],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.to_string(),
                        },
                    },
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Audio,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<Modality>,
    pub speech_config: SpeechConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Inline audio of the first candidate: the first part that carries
    /// inline data.
    pub fn first_audio(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.inline_data.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub inline_data: Option<InlineData>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_speech_request_shape() {
        let body = serde_json::to_value(GenerateContentRequest::speech("Hi", "Kore")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"parts": [{"text": "Hi"}]}],
                "generationConfig": {
                    "responseModalities": ["AUDIO"],
                    "speechConfig": {
                        "voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Kore"}}
                    }
                }
            })
        );
    }

    #[test]
    fn test_first_audio_found() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{
                    "inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAA"}
                }]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let audio = response.first_audio().unwrap();
        assert_eq!(audio.data, "AAAA");
        assert_eq!(
            audio.mime_type.as_deref(),
            Some("audio/L16;codec=pcm;rate=24000")
        );
    }

    #[test]
    fn test_first_audio_missing() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.first_audio().is_none());

        let text_only: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "no audio"}]}}]
        }))
        .unwrap();
        assert!(text_only.first_audio().is_none());
    }

    #[test]
    fn test_first_audio_skips_leading_text_part() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is your audio"},
                    {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAA"}},
                    {"inlineData": {"mimeType": "audio/L16", "data": "BBBB"}}
                ]}
            }]
        }))
        .unwrap();

        let audio = response.first_audio().unwrap();
        assert_eq!(audio.data, "AAAA");
        assert_eq!(
            audio.mime_type.as_deref(),
            Some("audio/L16;codec=pcm;rate=24000")
        );
    }

    #[test]
    fn test_error_body_parses() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "error": {"code": 400, "message": "Invalid voice", "status": "INVALID_ARGUMENT"}
        }))
        .unwrap();
        assert_eq!(body.error.code, Some(400));
        assert_eq!(body.error.message, "Invalid voice");
    }
}
