//! LLM prompt engineering for task extraction

use chrono::NaiveDate;
use taskdb_domain::{Category, Priority, DATE_FORMAT, DEFAULT_STATUS};

/// Builds prompts for the LLM to extract tasks
pub struct PromptBuilder<'a> {
    text: &'a str,
    today: Option<NaiveDate>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str) -> Self {
        Self { text, today: None }
    }

    /// Anchor relative dates ("tomorrow", "by Friday") to this day
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let categories = join_names(Category::ALL.iter().map(|c| c.as_str()));
        let priorities = join_names(Priority::ALL.iter().map(|p| p.as_str()));

        let mut prompt = String::new();

        prompt.push_str("Extract tasks from the following text and return them as a JSON list.\n");
        prompt.push_str("Each item should have: 'Task', ");
        prompt.push_str(&format!("'Category' ({}), ", categories));
        prompt.push_str(&format!("'Priority' ({}), ", priorities));
        prompt.push_str("'Due Date' (YYYY-MM-DD or 'None'), ");
        prompt.push_str(&format!("and 'Status' ({}).\n\n", DEFAULT_STATUS));

        if let Some(today) = self.today {
            prompt.push_str(&format!(
                "Today is {} ({}). Resolve relative dates against it.\n\n",
                today.format(DATE_FORMAT),
                today.format("%A")
            ));
        }

        prompt.push_str("Text: ");
        prompt.push_str(self.text);
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

fn join_names<'n>(names: impl Iterator<Item = &'n str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {"Task": "...", "Category": "...", "Priority": "...", "Due Date": "YYYY-MM-DD", "Status": "To Do"}
]

Return [] if the text contains no tasks.
Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text() {
        let prompt = PromptBuilder::new("Finish report by Friday, high priority").build();
        assert!(prompt.contains("Text: Finish report by Friday, high priority"));
    }

    #[test]
    fn test_prompt_lists_allowed_values() {
        let prompt = PromptBuilder::new("x").build();
        assert!(prompt.contains("'Category' (Work, Personal, Health, Finance)"));
        assert!(prompt.contains("'Priority' (High, Medium, Low)"));
        assert!(prompt.contains("'Due Date' (YYYY-MM-DD or 'None')"));
        assert!(prompt.contains("'Status' (To Do)"));
        assert!(prompt.contains("JSON list"));
    }

    #[test]
    fn test_prompt_includes_today_when_set() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let prompt = PromptBuilder::new("x").with_today(today).build();
        assert!(prompt.contains("Today is 2024-06-03 (Monday)"));
    }

    #[test]
    fn test_prompt_omits_today_by_default() {
        let prompt = PromptBuilder::new("x").build();
        assert!(!prompt.contains("Today is"));
    }

    #[test]
    fn test_prompt_ends_with_format_reminder() {
        let prompt = PromptBuilder::new("x").build();
        assert!(prompt.ends_with(OUTPUT_FORMAT_REMINDER));
    }
}
