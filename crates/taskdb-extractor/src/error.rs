//! Error types for the Extractor

use taskdb_llm::LlmError;
use thiserror::Error;

/// Longest slice of a malformed reply quoted in the error message
const RAW_PREVIEW_CHARS: usize = 120;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// No credential, or the upstream service rejected it
    #[error("Missing or invalid API key")]
    Unauthenticated,

    /// No text to extract from
    #[error("No text supplied")]
    EmptyInput,

    /// Network, timeout or service-side failure
    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The reply was not a JSON array of task objects
    #[error("Malformed response: {reason} (got: {})", preview(.raw))]
    MalformedResponse {
        /// What was wrong with the reply
        reason: String,
        /// The complete reply text
        raw: String,
    },
}

impl ExtractError {
    /// Build a `MalformedResponse` for the given reply
    pub fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        ExtractError::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }
}

impl From<LlmError> for ExtractError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Unauthorized(_) => ExtractError::Unauthenticated,
            LlmError::InvalidResponse { reason, body } => ExtractError::malformed(reason, body),
            other => ExtractError::UpstreamUnavailable(other.to_string()),
        }
    }
}

/// Single-line, length-limited excerpt of a reply
fn preview(raw: &str) -> String {
    let flat: String = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > RAW_PREVIEW_CHARS {
        let cut: String = flat.chars().take(RAW_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}
