//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{ExtractError, Extractor, ExtractorConfig, TaskSession};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration;
    use taskdb_domain::{Category, CompletionProvider, CompletionRequest, Priority, TaskRecord};
    use taskdb_llm::{LlmError, MockProvider};

    /// Provider that answers only after a delay
    struct SlowProvider {
        delay: Duration,
    }

    #[async_trait]
    impl CompletionProvider for SlowProvider {
        type Error = LlmError;

        async fn complete(
            &self,
            _credential: &str,
            _request: &CompletionRequest,
        ) -> Result<String, Self::Error> {
            tokio::time::sleep(self.delay).await;
            Ok("[]".to_string())
        }
    }

    fn session_with_reply(reply: &str) -> TaskSession<MockProvider> {
        let extractor = Extractor::new(MockProvider::new(reply), ExtractorConfig::default());
        TaskSession::new(extractor)
    }

    #[tokio::test]
    async fn test_scenario_single_well_formed_row() {
        let mut session = session_with_reply(
            r#"[{"Task":"Finish report","Category":"Work","Priority":"High","Due Date":"2024-06-07","Status":"To Do"}]"#,
        );

        let added = session
            .process("Finish report by Friday, high priority", "sk-test")
            .await
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(session.table().len(), 1);

        let expected = TaskRecord::new("Finish report", Category::Work)
            .with_priority(Priority::High)
            .with_due_date(NaiveDate::from_ymd_opt(2024, 6, 7).unwrap());
        assert_eq!(session.table().records()[0], expected);
    }

    #[tokio::test]
    async fn test_scenario_blank_credential() {
        let mut session = session_with_reply("[]");

        let result = session.process("Finish report by Friday", "").await;

        assert_eq!(result, Err(ExtractError::Unauthenticated));
        assert_eq!(session.extractor().provider().call_count(), 0);
        assert!(session.table().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_not_json() {
        let mut session = session_with_reply("not json");

        let result = session.process("Buy milk", "sk-test").await;

        assert!(matches!(
            result,
            Err(ExtractError::MalformedResponse { ref raw, .. }) if raw == "not json"
        ));
        assert!(session.table().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_empty_array() {
        let mut session = session_with_reply("[]");
        session
            .import(vec![TaskRecord::new("existing", Category::Finance)])
            .unwrap();

        let added = session.process("Nothing to do today", "sk-test").await.unwrap();

        assert_eq!(added, 0);
        assert_eq!(session.table().len(), 1);
    }

    #[tokio::test]
    async fn test_every_record_uses_known_enums() {
        let mut session = session_with_reply(
            r#"[
                {"Task": "a", "Category": "work", "Priority": "low"},
                {"Task": "b", "Category": "HEALTH"},
                {"Task": "c", "Priority": "High"},
                {"Task": "d", "Category": "Finance", "Priority": "medium"}
            ]"#,
        );

        session.process("text", "sk-test").await.unwrap();

        for record in session.table() {
            assert!(Category::ALL.contains(&record.category));
            assert!(Priority::ALL.contains(&record.priority));
        }
    }

    #[tokio::test]
    async fn test_one_request_per_call() {
        let mut session = session_with_reply(r#"[{"Task": "a"}]"#);

        session.process("first", "sk-test").await.unwrap();
        session.process("second", "sk-test").await.unwrap();

        assert_eq!(session.extractor().provider().call_count(), 2);
    }

    #[tokio::test]
    async fn test_timeout_becomes_upstream_unavailable() {
        let provider = SlowProvider {
            delay: Duration::from_secs(5),
        };
        let config = ExtractorConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };
        let mut session = TaskSession::new(Extractor::new(provider, config));

        let result = session.process("Buy milk", "sk-test").await;

        assert!(matches!(
            result,
            Err(ExtractError::UpstreamUnavailable(msg)) if msg.contains("1s")
        ));
        assert!(session.table().is_empty());
    }

    #[tokio::test]
    async fn test_model_from_config() {
        let config = ExtractorConfig {
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let extractor = Extractor::new(MockProvider::new("[]"), config);

        extractor.extract("Buy milk", "sk-test").await.unwrap();

        let call = extractor.provider().last_call().unwrap();
        assert_eq!(call.request.model, "gpt-4o-mini");
    }
}
