//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use chrono::{Local, NaiveDate};
use taskdb_domain::{CompletionProvider, CompletionRequest, TaskRecord};
use taskdb_llm::LlmError;
use tokio::time::timeout;
use tracing::{debug, info};

/// The Extractor converts free-form text into task records
///
/// It owns no task state: every call builds one prompt, sends one request
/// and returns the parsed records (or a typed failure) to the caller.
pub struct Extractor<L>
where
    L: CompletionProvider<Error = LlmError>,
{
    llm_provider: L,
    config: ExtractorConfig,
    today: Option<NaiveDate>,
}

impl<L> Extractor<L>
where
    L: CompletionProvider<Error = LlmError>,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
            today: None,
        }
    }

    /// Pin the date used to resolve relative due dates (defaults to the local date)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The underlying completion provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Extract task records from text
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Unauthenticated`] for a blank credential (nothing is sent)
    ///   or one the service rejects
    /// - [`ExtractError::EmptyInput`] for blank text (nothing is sent)
    /// - [`ExtractError::UpstreamUnavailable`] for network, timeout or service errors
    /// - [`ExtractError::MalformedResponse`] when the reply is not a JSON task array
    pub async fn extract(
        &self,
        text: &str,
        credential: &str,
    ) -> Result<Vec<TaskRecord>, ExtractError> {
        if credential.trim().is_empty() {
            return Err(ExtractError::Unauthenticated);
        }
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyInput);
        }

        info!(
            "Starting extraction with model '{}', text length {}",
            self.config.model,
            text.len()
        );

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let prompt = PromptBuilder::new(text).with_today(today).build();

        debug!("Prompt length: {} chars", prompt.len());

        let request = CompletionRequest::deterministic(self.config.model.clone(), prompt);

        // Call LLM with timeout
        let llm_response = timeout(
            self.config.request_timeout(),
            self.llm_provider.complete(credential, &request),
        )
        .await
        .map_err(|_| {
            ExtractError::UpstreamUnavailable(format!(
                "no response within {}s",
                self.config.request_timeout_secs
            ))
        })??;

        debug!("LLM response length: {} chars", llm_response.len());

        let tasks = parse_llm_response(&llm_response)?;

        info!("Extraction complete: {} tasks", tasks.len());

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdb_llm::MockProvider;

    fn create_test_extractor(reply: &str) -> Extractor<MockProvider> {
        Extractor::new(MockProvider::new(reply), ExtractorConfig::default())
            .with_today(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
    }

    #[tokio::test]
    async fn test_extract_empty_response() {
        let extractor = create_test_extractor("[]");
        let tasks = extractor.extract("Some text", "sk-test").await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_blank_credential_never_calls_upstream() {
        let extractor = create_test_extractor("[]");

        for credential in ["", "   "] {
            let result = extractor.extract("Buy milk", credential).await;
            assert_eq!(result, Err(ExtractError::Unauthenticated));
        }
        assert_eq!(extractor.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_text_never_calls_upstream() {
        let extractor = create_test_extractor("[]");
        let result = extractor.extract(" \n\t", "sk-test").await;
        assert_eq!(result, Err(ExtractError::EmptyInput));
        assert_eq!(extractor.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let extractor = create_test_extractor("[]");
        extractor.extract("Buy milk tomorrow", "sk-test").await.unwrap();

        let call = extractor.provider().last_call().unwrap();
        assert_eq!(call.credential, "sk-test");
        assert_eq!(call.request.model, "gpt-3.5-turbo");
        assert_eq!(call.request.temperature, 0.0);
        assert!(call.request.prompt.contains("Buy milk tomorrow"));
        assert!(call.request.prompt.contains("Today is 2024-06-03"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported() {
        let provider = MockProvider::failing(LlmError::Communication("connection refused".into()));
        let extractor = Extractor::new(provider, ExtractorConfig::default());

        let result = extractor.extract("Buy milk", "sk-test").await;
        assert!(matches!(
            result,
            Err(ExtractError::UpstreamUnavailable(msg)) if msg.contains("connection refused")
        ));
    }

    #[tokio::test]
    async fn test_upstream_rejects_credential() {
        let provider = MockProvider::failing(LlmError::Unauthorized("HTTP 401".into()));
        let extractor = Extractor::new(provider, ExtractorConfig::default());

        let result = extractor.extract("Buy milk", "sk-revoked").await;
        assert_eq!(result, Err(ExtractError::Unauthenticated));
    }
}
