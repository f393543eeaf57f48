//! Wiremock integration tests for OpenAiClient.
//!
//! These tests verify correct HTTP interaction and error handling for
//! both capabilities (chat completion and transcription) using mocked
//! responses.

use std::time::Duration;

use muninn::MuninnError;
use muninn::providers::OpenAiClient;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

/// Test successful chat completion.
#[tokio::test]
async fn test_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_string_contains("gpt-4o-mini"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("0.9")))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    let result = client
        .complete("Thanks for waiting.", "", "Score the professionalism.")
        .await;

    assert_eq!(result.expect("complete should succeed"), "0.9");
}

/// The system directive and user content both travel in the request body.
#[tokio::test]
async fn test_complete_sends_directive_and_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Score the professionalism."))
        .and(body_string_contains("Thanks for waiting."))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("0.9")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    client
        .complete("Thanks for waiting.", "", "Score the professionalism.")
        .await
        .unwrap();
}

/// Retrieval context is folded into the user turn.
#[tokio::test]
async fn test_complete_folds_context_into_user_turn() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Context:"))
        .and(body_string_contains("Plans start at RM40."))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("answer")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    client
        .complete("what plans exist?", "Plans start at RM40.", "Answer questions.")
        .await
        .unwrap();
}

/// A configured chat model replaces the default in the request body.
#[tokio::test]
async fn test_complete_uses_configured_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("gpt-4o"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("ok")))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).chat_model("gpt-4o");
    client.complete("hi", "", "directive").await.unwrap();
}

#[tokio::test]
async fn test_complete_401_maps_to_authentication_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("bad_key", mock_server.uri());
    let err = client.complete("hi", "", "directive").await.unwrap_err();

    assert!(matches!(err, MuninnError::AuthenticationFailed));
}

#[tokio::test]
async fn test_complete_429_maps_to_rate_limited_with_hint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    let err = client.complete("hi", "", "directive").await.unwrap_err();

    match err {
        MuninnError::RateLimited { retry_after } => {
            assert_eq!(retry_after, Some(Duration::from_secs(2)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_complete_5xx_maps_to_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    let err = client.complete("hi", "", "directive").await.unwrap_err();

    assert!(matches!(err, MuninnError::Unavailable(_)));
}

#[tokio::test]
async fn test_complete_unexpected_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    let err = client.complete("hi", "", "directive").await.unwrap_err();

    assert!(matches!(err, MuninnError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_complete_no_choices_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    let err = client.complete("hi", "", "directive").await.unwrap_err();

    assert!(matches!(err, MuninnError::EmptyResponse));
}

// ============================================================================
// Transcription
// ============================================================================

/// Test successful transcription; the multipart body carries the file
/// name and the model field.
#[tokio::test]
async fn test_transcribe_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_string_contains("issue.mp3"))
        .and(body_string_contains("whisper-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"text": "my roaming is broken"})),
        )
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    let result = client.transcribe(b"fake-audio-bytes", "issue.mp3").await;

    assert_eq!(result.expect("transcribe should succeed"), "my roaming is broken");
}

#[tokio::test]
async fn test_transcribe_empty_text_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "  "})))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    let err = client.transcribe(b"fake", "clip.mp3").await.unwrap_err();

    assert!(matches!(err, MuninnError::EmptyResponse));
}

/// Unsupported formats surface as API errors with the upstream status.
#[tokio::test]
async fn test_transcribe_unsupported_format_is_an_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(415))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri());
    let err = client.transcribe(b"not-audio", "clip.xyz").await.unwrap_err();

    assert!(matches!(err, MuninnError::Api { status: 415, .. }));
}
