//! OpenAI-compatible client for chat completions and audio transcription.
//!
//! One client, two capabilities: it implements [`ModelGateway`] over the
//! `chat/completions` endpoint and [`TranscriptionGateway`] over the
//! multipart `audio/transcriptions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::traits::{ModelGateway, TranscriptionGateway};
use crate::{MuninnError, Result};

/// Default base URL for the OpenAI API
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default chat model when none is configured.
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Default transcription model when none is configured.
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Client for an OpenAI-compatible API.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: Client,
    base_url: String,
    chat_model: String,
    transcription_model: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
        }
    }

    /// Set the chat model.
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Set the transcription model.
    pub fn transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    /// Single-turn chat completion.
    ///
    /// The system directive becomes the system message; retrieval context,
    /// when present, is folded into the user turn ahead of the content.
    /// Temperature is pinned to 0 so the prompt contract stays as
    /// repeatable as the upstream service allows.
    pub async fn complete(
        &self,
        user_content: &str,
        context: &str,
        system_directive: &str,
    ) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let user_turn = if context.is_empty() {
            user_content.to_string()
        } else {
            format!("Context:\n{context}\n\n{user_content}")
        };

        let request = ChatCompletionRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_directive,
                },
                ChatMessage {
                    role: "user",
                    content: &user_turn,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        handle_response_errors(&response)?;

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| MuninnError::InvalidResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(MuninnError::EmptyResponse)?;

        Ok(content)
    }

    /// Transcribe an audio payload via the multipart transcription endpoint.
    pub async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String> {
        let url = format!("{}/v1/audio/transcriptions", self.base_url);

        let file = reqwest::multipart::Part::bytes(audio.to_vec()).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", self.transcription_model.clone());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        handle_response_errors(&response)?;

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| MuninnError::InvalidResponse(e.to_string()))?;

        if body.text.trim().is_empty() {
            return Err(MuninnError::EmptyResponse);
        }

        Ok(body.text)
    }
}

/// Map a reqwest transport failure to the gateway error taxonomy.
fn map_transport_error(err: reqwest::Error) -> MuninnError {
    if err.is_timeout() {
        MuninnError::Timeout
    } else if err.is_connect() {
        MuninnError::Unavailable(err.to_string())
    } else {
        MuninnError::Http(err.to_string())
    }
}

/// Check response status and map to the appropriate error.
fn handle_response_errors(response: &reqwest::Response) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        401 => Err(MuninnError::AuthenticationFailed),
        408 => Err(MuninnError::Timeout),
        429 => {
            // Try to parse retry-after header
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(MuninnError::RateLimited { retry_after })
        }
        500..=599 => Err(MuninnError::Unavailable(format!("upstream returned {status}"))),
        code => Err(MuninnError::Api {
            status: code,
            message: format!("API error: {status}"),
        }),
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

// ============================================================================
// Gateway Trait Implementations
// ============================================================================

#[async_trait]
impl ModelGateway for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        user_content: &str,
        context: &str,
        system_directive: &str,
    ) -> Result<String> {
        // Delegate to the existing method
        OpenAiClient::complete(self, user_content, context, system_directive).await
    }
}

#[async_trait]
impl TranscriptionGateway for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String> {
        // Delegate to the existing method
        OpenAiClient::transcribe(self, audio, file_name).await
    }
}
