//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use async_trait::async_trait;

/// Sampling temperature that makes upstream completions as deterministic as possible
pub const DETERMINISTIC_TEMPERATURE: f32 = 0.0;

/// A single completion request sent upstream
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Upstream model identifier
    pub model: String,

    /// The prompt, sent as the only user-role message
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request at the deterministic temperature
    pub fn deterministic(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: DETERMINISTIC_TEMPERATURE,
        }
    }
}

/// Trait for language model completion services
///
/// Implemented by the infrastructure layer (taskdb-llm). The credential is
/// passed per call and must never be stored or logged by implementations.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Error type for completion operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send one request and return the model's text reply
    async fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> Result<String, Self::Error>;
}
