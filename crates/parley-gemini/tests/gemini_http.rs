//! End-to-end tests for the Gemini client against a local HTTP responder.
//!
//! Each test binds a throwaway listener on 127.0.0.1, points the client at
//! it, and answers with canned HTTP responses. No external network access.

use std::time::Duration;

use parley_core::{PcmFormat, SpeechSynthesizer, SynthesisError};
use parley_gemini::{DefaultGeminiClient, GeminiClientConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned `(status, body)` per connection, in order, and return
/// the raw requests received.
async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v1beta", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let reply = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        requests
    });

    (base_url, handle)
}

/// Read headers and a `content-length` body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn config(base_url: &str) -> GeminiClientConfig {
    GeminiClientConfig::new()
        .with_base_url(base_url)
        .with_api_key("test-key")
        .with_timeout(Duration::from_secs(5))
        .with_retry_delay(Duration::from_millis(1))
}

const AUDIO_BODY: &str = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"audio/L16;codec=pcm;rate=24000","data":"AEAAQA=="}}]},"finishReason":"STOP"}]}"#;

#[tokio::test]
async fn synthesizes_against_generate_content() {
    let (base_url, server) = serve(vec![(200, AUDIO_BODY.to_string())]).await;
    let client = DefaultGeminiClient::new(&config(&base_url)).unwrap();

    let speech = client.synthesize("Hello there", "Kore").await.unwrap();

    assert_eq!(speech.payload.unwrap().as_str(), "AEAAQA==");
    assert_eq!(speech.format, PcmFormat::new(24_000, 1));

    let requests = server.await.unwrap();
    let request = &requests[0];
    assert!(request.starts_with(
        "POST /v1beta/models/gemini-2.5-flash-preview-tts:generateContent"
    ));
    assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    assert!(request.contains(r#""voiceName":"Kore""#));
    assert!(request.contains(r#""responseModalities":["AUDIO"]"#));
}

#[tokio::test]
async fn server_errors_are_retried() {
    let (base_url, server) = serve(vec![
        (503, r#"{"error":{"message":"overloaded"}}"#.to_string()),
        (200, AUDIO_BODY.to_string()),
    ])
    .await;
    let client = DefaultGeminiClient::new(&config(&base_url).with_max_retries(2)).unwrap();

    let speech = client.synthesize("Hello", "Puck").await.unwrap();

    assert!(speech.payload.is_some());
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn client_errors_fail_fast_with_api_message() {
    let (base_url, server) = serve(vec![(
        400,
        r#"{"error":{"code":400,"message":"Invalid voice name","status":"INVALID_ARGUMENT"}}"#
            .to_string(),
    )])
    .await;
    let client = DefaultGeminiClient::new(&config(&base_url)).unwrap();

    let err = client.synthesize("Hello", "Nobody").await.unwrap_err();

    match err {
        SynthesisError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid voice name");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_api_key_is_a_synthesis_failure() {
    let client = DefaultGeminiClient::new(
        &GeminiClientConfig::new().with_base_url("http://127.0.0.1:9/v1beta"),
    )
    .unwrap();

    let err = client.synthesize("Hello", "Puck").await.unwrap_err();

    assert!(matches!(err, SynthesisError::Network(_)));
}

#[test]
fn invalid_base_url_is_rejected_at_construction() {
    let result = DefaultGeminiClient::new(&GeminiClientConfig::new().with_base_url("::nope::"));
    assert!(result.is_err());
}
