//! Parse LLM output into task records

use crate::error::ExtractError;
use serde_json::{Map, Value};
use taskdb_domain::{RawTaskFields, TaskRecord};
use tracing::warn;

/// Keys accepted for the due date, in lookup order
const DUE_DATE_KEYS: [&str; 2] = ["Due Date", "DueDate"];

/// Parse the LLM reply into task records
///
/// The reply must be a JSON array of objects and nothing else. One bad item
/// fails the whole batch; records are returned in reply order.
pub fn parse_llm_response(response: &str) -> Result<Vec<TaskRecord>, ExtractError> {
    let json: Value = serde_json::from_str(response)
        .map_err(|e| ExtractError::malformed(format!("not valid JSON: {}", e), response))?;

    let items = json
        .as_array()
        .ok_or_else(|| ExtractError::malformed("expected a JSON array", response))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            parse_task_json(item).map_err(|e| {
                warn!("Task {} in reply rejected: {}", idx, e);
                ExtractError::malformed(format!("item {}: {}", idx, e), response)
            })
        })
        .collect()
}

/// Parse a single task from JSON
fn parse_task_json(json: &Value) -> Result<TaskRecord, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "task is not a JSON object".to_string())?;

    let fields = RawTaskFields {
        task: string_field(obj, "Task")?,
        category: string_field(obj, "Category")?,
        priority: string_field(obj, "Priority")?,
        due_date: due_date_field(obj)?,
        status: string_field(obj, "Status")?,
    };

    fields.into_record().map_err(|e| e.to_string())
}

/// Read an optional string field; `null` counts as absent
fn string_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, String> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(format!("'{}' must be a string, got {}", key, other)),
    }
}

fn due_date_field(obj: &Map<String, Value>) -> Result<Option<&str>, String> {
    for key in DUE_DATE_KEYS {
        if let Some(value) = string_field(obj, key)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}
