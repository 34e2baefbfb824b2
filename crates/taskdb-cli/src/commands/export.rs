//! Export and import command implementations.

use crate::error::{CliError, Result};
use crate::export::{read_csv_file, write_csv_file, DEFAULT_EXPORT_FILE};
use crate::output::Formatter;
use std::path::{Path, PathBuf};
use taskdb_domain::CompletionProvider;
use taskdb_extractor::TaskSession;
use taskdb_llm::LlmError;

/// Write the session's table to `path`, or [`DEFAULT_EXPORT_FILE`].
///
/// Returns the path written.
pub fn execute_export<L>(
    session: &TaskSession<L>,
    path: Option<&Path>,
    formatter: &Formatter,
) -> Result<PathBuf>
where
    L: CompletionProvider<Error = LlmError>,
{
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

    let records = session.table().records();
    write_csv_file(records, &path)?;

    println!(
        "{}",
        formatter.success(&format!("Exported {} task(s) to {}", records.len(), path.display()))
    );

    Ok(path)
}

/// Append the rows of a CSV file to the session's table.
///
/// The whole file is validated before any row is appended.
pub fn execute_import<L>(
    session: &mut TaskSession<L>,
    path: &Path,
    formatter: &Formatter,
) -> Result<usize>
where
    L: CompletionProvider<Error = LlmError>,
{
    let records = read_csv_file(path)?;
    let added = session
        .import(records)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    println!(
        "{}",
        formatter.success(&format!("Imported {} task(s) from {}", added, path.display()))
    );

    Ok(added)
}
