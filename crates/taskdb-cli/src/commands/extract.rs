//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use crate::export::write_csv_file;
use crate::output::Formatter;
use std::io::Read;
use taskdb_domain::CompletionProvider;
use taskdb_extractor::TaskSession;
use taskdb_llm::LlmError;

/// Execute the extract command.
///
/// Status lines go to stderr so that `--format json` and `--format csv`
/// leave stdout holding only the table.
pub async fn execute_extract<L>(
    args: ExtractArgs,
    session: &mut TaskSession<L>,
    credential: &str,
    formatter: &Formatter,
) -> Result<()>
where
    L: CompletionProvider<Error = LlmError>,
{
    let text = read_text(&args, std::io::stdin())?;

    let added = session.process(&text, credential).await?;
    eprintln!("{}", formatter.tasks_extracted(added));

    let records = session.table().records();
    println!("{}", formatter.format_tasks(records)?);

    if let Some(path) = &args.output {
        write_csv_file(records, path)?;
        eprintln!(
            "{}",
            formatter.success(&format!("Wrote {} task(s) to {}", records.len(), path.display()))
        );
    }

    Ok(())
}

/// Pick the input text from the positional argument or from `reader`.
fn read_text<R: Read>(args: &ExtractArgs, mut reader: R) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    if args.stdin {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        return Ok(text);
    }

    Err(CliError::InvalidInput(
        "Provide text to extract from, or pass --stdin".to_string(),
    ))
}
