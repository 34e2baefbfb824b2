//! OpenAI Provider Implementation
//!
//! Provides integration with OpenAI-compatible chat completion APIs.
//!
//! # Features
//!
//! - Async HTTP communication with the `/chat/completions` endpoint
//! - Configurable endpoint and timeout
//! - Exactly one request per call (no retries, no streaming)
//!
//! # Examples
//!
//! ```no_run
//! use taskdb_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("https://api.openai.com/v1").unwrap();
//! ```

use crate::LlmError;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use taskdb_domain::{CompletionProvider, CompletionRequest};
use tracing::debug;

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI-compatible chat completion provider
///
/// The provider holds no credential; each call supplies its own.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider with the default timeout
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.openai.com/v1")
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new provider with an explicit transport timeout
    pub fn with_timeout(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    /// The API base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one chat completion request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The service is unreachable or the request times out
    /// - The credential is rejected (401/403)
    /// - The model does not exist (404)
    /// - The service is rate limiting (429)
    /// - The response envelope is not a chat completion
    pub async fn chat(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);

        // A key with control characters cannot travel in a header
        if HeaderValue::from_str(&format!("Bearer {}", credential)).is_err() {
            return Err(LlmError::Unauthorized(
                "API key contains characters not allowed in an HTTP header".to_string(),
            ));
        }

        let body = ChatRequest {
            model: &request.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
        };

        debug!(
            "POST {} model={} prompt_len={}",
            url,
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        debug!("Response status {} body_len={}", status, text.len());

        if !status.is_success() {
            return Err(status_error(status, &request.model, &text));
        }

        parse_chat_response(&text)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> Result<String, Self::Error> {
        self.chat(credential, request).await
    }
}

/// Map a non-success HTTP status to an error
fn status_error(status: StatusCode, model: &str, body: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::Unauthorized(format!("HTTP {}", status))
        }
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body.trim())),
    }
}

/// Pull the assistant text out of a chat completion envelope
fn parse_chat_response(body: &str) -> Result<String, LlmError> {
    let invalid = |reason: String| LlmError::InvalidResponse {
        reason,
        body: body.to_string(),
    };

    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| invalid(format!("Failed to parse response: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| invalid("Response contained no message content".to_string()))
}
