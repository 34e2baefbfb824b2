//! taskdb LLM Provider Layer
//!
//! Completion service implementations of the `CompletionProvider` trait from
//! `taskdb-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use taskdb_domain::{CompletionProvider, CompletionRequest};
//! use taskdb_llm::MockProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("[]");
//! let request = CompletionRequest::deterministic("gpt-3.5-turbo", "test prompt");
//! let result = provider.complete("sk-test", &request).await.unwrap();
//! assert_eq!(result, "[]");
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use taskdb_domain::{CompletionProvider, CompletionRequest};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not complete in time
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The service rejected the credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid response from LLM
    #[error("Invalid response: {reason}")]
    InvalidResponse {
        /// What was wrong with the response
        reason: String,
        /// The response body as received
        body: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use taskdb_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_error("prompt2", taskdb_llm::LlmError::RateLimitExceeded);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Result<String, LlmError>,
    responses: Arc<Mutex<HashMap<String, Result<String, LlmError>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// A request observed by [`MockProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// Credential the caller passed
    pub credential: String,

    /// Request the caller sent
    pub request: CompletionRequest,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Ok(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockProvider that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            default_response: Err(error),
            ..Self::new("")
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, error: LlmError) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), Err(error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent call, if any
    pub fn last_call(&self) -> Option<MockCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Reset the recorded calls
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(MockCall {
            credential: credential.to_string(),
            request: request.clone(),
        });

        let responses = self.responses.lock().unwrap();
        match responses.get(&request.prompt) {
            Some(response) => response.clone(),
            None => self.default_response.clone(),
        }
    }
}
