//! HTTP backend abstraction for the Gemini API.
//!
//! The client is generic over [`HttpBackend`] so tests can swap in canned
//! responses. The production implementation uses reqwest with automatic
//! retry for transient errors.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::GeminiClientConfig;
use crate::error::{GeminiError, GeminiResult};
use crate::models::ApiErrorBody;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can POST JSON and read JSON back.
///
/// This is an implementation detail - external code should use the
/// `SpeechSynthesizer` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST `body` as JSON to `url` and deserialize the response.
    async fn post_json<B, T>(&self, url: &Url, body: &B) -> GeminiResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx)
/// and network errors.
pub struct ReqwestBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &GeminiClientConfig) -> GeminiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeminiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// POST with automatic retry for transient errors.
    async fn post_with_retry<B: Serialize + Sync>(
        &self,
        url: &Url,
        body: &B,
    ) -> GeminiResult<reqwest::Response> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let mut last_error: Option<GeminiError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self
                    .retry_base_delay
                    .saturating_mul(2u32.saturating_pow(u32::from(attempt) - 1));
                tracing::debug!(attempt, delay_ms = delay.as_millis(), "Retrying Gemini request");
                tokio::time::sleep(delay).await;
            }

            let request = self
                .client
                .post(url.as_str())
                .header("x-goog-api-key", api_key)
                .json(body);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        tracing::warn!(status = status.as_u16(), attempt, "Gemini server error");
                        last_error = Some(GeminiError::ApiRequestFailed {
                            status: status.as_u16(),
                            message: url.path().to_string(),
                        });
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    let message = error_message(response, url).await;
                    return Err(GeminiError::ApiRequestFailed {
                        status: status.as_u16(),
                        message,
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        tracing::warn!(error = %e, attempt, "Gemini request failed");
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GeminiError::InvalidResponse {
            message: "Unknown error during request".to_string(),
        }))
    }
}

/// Best available description of a failed response: the API's own error
/// message, else the request path.
async fn error_message(response: reqwest::Response, url: &Url) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .map(|body| body.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| url.path().to_string())
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json<B, T>(&self, url: &Url, body: &B) -> GeminiResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let response = self.post_with_retry(url, body).await?;
        let data: T = response.json().await?;
        Ok(data)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
