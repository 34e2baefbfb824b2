//! Session state: one task table plus the extractor that feeds it

use crate::error::ExtractError;
use crate::extractor::Extractor;
use taskdb_domain::{CompletionProvider, ParseFieldError, TaskRecord, TaskTable};
use taskdb_llm::LlmError;
use tracing::info;

/// An interactive session's state
///
/// Each session owns its own [`TaskTable`]; sessions never share rows.
/// [`TaskSession::process`] borrows the session mutably, so a second
/// extraction cannot start until the first one has returned.
pub struct TaskSession<L>
where
    L: CompletionProvider<Error = LlmError>,
{
    extractor: Extractor<L>,
    table: TaskTable,
}

impl<L> TaskSession<L>
where
    L: CompletionProvider<Error = LlmError>,
{
    /// Create a session with an empty table
    pub fn new(extractor: Extractor<L>) -> Self {
        Self {
            extractor,
            table: TaskTable::new(),
        }
    }

    /// Extract tasks from `text` and append them to the table
    ///
    /// Returns the number of rows added. On error the table is left
    /// exactly as it was.
    pub async fn process(&mut self, text: &str, credential: &str) -> Result<usize, ExtractError> {
        let tasks = self.extractor.extract(text, credential).await?;
        let added = self.table.append(tasks);
        info!("Appended {} tasks, table now has {}", added, self.table.len());
        Ok(added)
    }

    /// Append already-structured records (e.g. from an imported file)
    ///
    /// Every record is validated first; if any fails, nothing is appended.
    pub fn import(&mut self, records: Vec<TaskRecord>) -> Result<usize, ParseFieldError> {
        records.iter().try_for_each(TaskRecord::validate)?;
        Ok(self.table.append(records))
    }

    /// Remove every row
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// The current table
    pub fn table(&self) -> &TaskTable {
        &self.table
    }

    /// The session's extractor
    pub fn extractor(&self) -> &Extractor<L> {
        &self.extractor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractorConfig;
    use taskdb_domain::Category;
    use taskdb_llm::MockProvider;

    fn session(reply: &str) -> TaskSession<MockProvider> {
        TaskSession::new(Extractor::new(MockProvider::new(reply), ExtractorConfig::default()))
    }

    #[tokio::test]
    async fn test_process_appends() {
        let mut session = session(r#"[{"Task": "a"}, {"Task": "b"}]"#);

        assert_eq!(session.process("text", "sk").await.unwrap(), 2);
        assert_eq!(session.process("text", "sk").await.unwrap(), 2);
        assert_eq!(session.table().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_process_leaves_table_untouched() {
        let mut session = session("not json");
        session
            .import(vec![TaskRecord::new("existing", Category::Work)])
            .unwrap();

        let result = session.process("text", "sk").await;
        assert!(matches!(result, Err(ExtractError::MalformedResponse { .. })));
        assert_eq!(session.table().len(), 1);
        assert_eq!(session.table().records()[0].task, "existing");
    }

    #[test]
    fn test_import_rejects_blank_task() {
        let mut session = session("[]");
        let records = vec![
            TaskRecord::new("fine", Category::Work),
            TaskRecord::new("  ", Category::Work),
        ];

        let err = session.import(records).unwrap_err();
        assert_eq!(err.field, "Task");
        assert!(session.table().is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let mut session = session(r#"[{"Task": "a"}]"#);
        session.process("text", "sk").await.unwrap();

        session.clear();
        assert!(session.table().is_empty());
        session.clear();
        assert!(session.table().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let mut first = session(r#"[{"Task": "a"}]"#);
        let mut second = session(r#"[{"Task": "b"}, {"Task": "c"}]"#);

        first.process("text", "sk").await.unwrap();
        second.process("text", "sk").await.unwrap();
        first.clear();

        assert_eq!(first.table().len(), 0);
        assert_eq!(second.table().len(), 2);
    }
}
