//! CSV export and import of the task table.
//!
//! The file has a header row with the column names exactly as in
//! [`COLUMNS`], one row per task, and an empty cell for a missing due date.

use crate::error::{CliError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use taskdb_domain::{RawTaskFields, TaskRecord, COLUMNS};
use tracing::debug;

/// File name used when `export` is given no path.
pub const DEFAULT_EXPORT_FILE: &str = "tasks.csv";

/// Write records as CSV, header first.
pub fn write_csv<W: Write>(records: &[TaskRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render records as a CSV string.
pub fn to_csv_string(records: &[TaskRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| CliError::InvalidInput(format!("CSV is not UTF-8: {}", e)))
}

/// Write records to a CSV file, replacing it if present.
pub fn write_csv_file(records: &[TaskRecord], path: &Path) -> Result<()> {
    debug!("Writing {} tasks to {}", records.len(), path.display());
    let file = File::create(path)?;
    write_csv(records, file)
}

/// Parse CSV produced by [`write_csv`] back into records.
///
/// Columns are located by header name, so their order does not matter.
/// Only the `Task` column is required.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<TaskRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    // Spreadsheets often save with a byte order mark before the first header
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
    };
    let [task, category, priority, due_date, status] = COLUMNS.map(column);

    if task.is_none() {
        return Err(CliError::InvalidInput("CSV has no 'Task' column".to_string()));
    }

    let mut records = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let row = row?;
        let cell = |col: Option<usize>| col.and_then(|i| row.get(i)).filter(|v| !v.is_empty());

        let fields = RawTaskFields {
            task: cell(task),
            category: cell(category),
            priority: cell(priority),
            due_date: cell(due_date),
            status: cell(status),
        };

        // Row 1 is the header
        let record = fields
            .into_record()
            .map_err(|e| CliError::InvalidInput(format!("row {}: {}", idx + 2, e)))?;
        records.push(record);
    }

    Ok(records)
}

/// Read records from a CSV file.
pub fn read_csv_file(path: &Path) -> Result<Vec<TaskRecord>> {
    debug!("Reading tasks from {}", path.display());
    let file = File::open(path)?;
    read_csv(file)
}
