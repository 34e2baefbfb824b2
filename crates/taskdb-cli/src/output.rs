//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::export::to_csv_string;
use colored::*;
use taskdb_domain::{TaskRecord, COLUMNS};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format tasks output.
    pub fn format_tasks(&self, tasks: &[TaskRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_tasks_json(tasks),
            OutputFormat::Table => self.format_tasks_table(tasks),
            OutputFormat::Csv => to_csv_string(tasks),
        }
    }

    /// Format tasks as JSON, using the same keys the model is asked for.
    fn format_tasks_json(&self, tasks: &[TaskRecord]) -> Result<String> {
        let json_tasks: Vec<serde_json::Value> = tasks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "Task": t.task,
                    "Category": t.category.as_str(),
                    "Priority": t.priority.as_str(),
                    "Due Date": t.due_date.map(|_| t.due_date_string()),
                    "Status": t.status,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_tasks)?)
    }

    /// Format tasks as a table.
    fn format_tasks_table(&self, tasks: &[TaskRecord]) -> Result<String> {
        if tasks.is_empty() {
            return Ok(self.colorize("No tasks processed yet.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(COLUMNS);

        for task in tasks {
            builder.push_record(task.to_row());
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format the result of an extraction.
    pub fn tasks_extracted(&self, count: usize) -> String {
        if count == 0 {
            self.warning("No tasks found in the text")
        } else {
            self.success(&format!("Extracted {} task(s)", count))
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
