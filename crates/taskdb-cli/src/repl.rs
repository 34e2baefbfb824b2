//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::commands;
use crate::config::{Config, Settings};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::path::PathBuf;
use taskdb_domain::CompletionProvider;
use taskdb_extractor::TaskSession;
use taskdb_llm::LlmError;
use tracing::debug;

/// Run the interactive REPL.
///
/// Each `process` awaits its extraction before the next line is read, so
/// at most one request is outstanding.
pub async fn run_repl<L>(
    session: &mut TaskSession<L>,
    mut credential: String,
    settings: &Settings,
    formatter: &Formatter,
) -> Result<()>
where
    L: CompletionProvider<Error = LlmError>,
{
    println!("{}", formatter.info("taskdb REPL - Type 'help' for commands, 'exit' to quit"));
    println!("{}", formatter.info(&banner_model_line(session)));
    if credential.trim().is_empty() {
        println!(
            "{}",
            formatter.warning("No API key set. Use 'key <value>' or set OPENAI_API_KEY")
        );
    }
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(settings.history_size)
        .map_err(editor_error)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    if let Err(e) = editor.load_history(&history_path) {
        debug!("No history loaded from {}: {}", history_path.display(), e);
    }

    loop {
        match editor.readline("taskdb> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let parsed = parse_repl_command(line);

                // Credentials never reach the history file
                if !matches!(parsed, Ok(ReplCommand::Key(_))) {
                    editor.add_history_entry(line).ok();
                }

                match parsed {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) =
                            execute_repl_command(cmd, session, &mut credential, formatter).await
                        {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    if let Err(e) = editor.save_history(&history_path) {
        debug!("Could not save history to {}: {}", history_path.display(), e);
    }

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    Process(String),
    Show,
    Clear,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Key(String),
}

/// Parse a REPL command line.
///
/// The first word names the command; for `process` and `key` the rest of
/// the line is taken verbatim.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    if name.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match name {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "show" => Ok(ReplCommand::Show),
        "clear" => Ok(ReplCommand::Clear),
        "process" | "p" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: process <text>".to_string()));
            }
            Ok(ReplCommand::Process(rest.to_string()))
        }
        "export" => Ok(ReplCommand::Export(
            (!rest.is_empty()).then(|| PathBuf::from(rest)),
        )),
        "import" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: import <file>".to_string()));
            }
            Ok(ReplCommand::Import(PathBuf::from(rest)))
        }
        "key" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: key <credential>".to_string()));
            }
            Ok(ReplCommand::Key(rest.to_string()))
        }
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            name
        ))),
    }
}

/// Execute a REPL command.
///
/// A failed command leaves the table as it was.
async fn execute_repl_command<L>(
    cmd: ReplCommand,
    session: &mut TaskSession<L>,
    credential: &mut String,
    formatter: &Formatter,
) -> Result<()>
where
    L: CompletionProvider<Error = LlmError>,
{
    match cmd {
        ReplCommand::Process(text) => {
            let added = session.process(&text, credential).await?;
            println!("{}", formatter.tasks_extracted(added));
            println!("{}", formatter.format_tasks(session.table().records())?);
        }
        ReplCommand::Show => {
            println!("{}", formatter.format_tasks(session.table().records())?);
        }
        ReplCommand::Clear => {
            session.clear();
            println!("{}", formatter.success("Table cleared"));
        }
        ReplCommand::Export(path) => {
            commands::execute_export(session, path.as_deref(), formatter)?;
        }
        ReplCommand::Import(path) => {
            commands::execute_import(session, &path, formatter)?;
        }
        ReplCommand::Key(value) => {
            *credential = value;
            println!("{}", formatter.success("API key set for this session"));
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

/// Which model and endpoint `process` will call.
fn banner_model_line<L>(session: &TaskSession<L>) -> String
where
    L: CompletionProvider<Error = LlmError>,
{
    let config = session.extractor().config();
    format!("Model {} at {}", config.model, config.endpoint)
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::data_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  process <text>, p <text>  - Extract tasks from text and add them to the table");
    println!("  show                      - Show the task table");
    println!("  clear                     - Remove every task from the table");
    println!("  export [file]             - Write the table as CSV (default: tasks.csv)");
    println!("  import <file>             - Append tasks from a CSV file");
    println!("  key <credential>          - Set the API key for this session");
    println!("  help, ?                   - Show this help");
    println!("  exit, quit, q             - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use taskdb_extractor::{ExtractError, Extractor, ExtractorConfig};
    use taskdb_llm::MockProvider;
    use tempfile::tempdir;

    fn session(reply: &str) -> TaskSession<MockProvider> {
        TaskSession::new(Extractor::new(MockProvider::new(reply), ExtractorConfig::default()))
    }

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_banner_names_configured_model() {
        let config = ExtractorConfig {
            model: "gpt-4o-mini".to_string(),
            ..ExtractorConfig::default()
        };
        let session = TaskSession::new(Extractor::new(MockProvider::default(), config));

        let line = banner_model_line(&session);
        assert!(line.contains("gpt-4o-mini"));
        assert!(line.contains("https://api.openai.com/v1"));
    }

    #[test]
    fn test_parse_process_keeps_rest_of_line() {
        assert_eq!(
            parse_repl_command("process Finish report by Friday,  high priority").unwrap(),
            ReplCommand::Process("Finish report by Friday,  high priority".to_string())
        );
        assert_eq!(
            parse_repl_command("p buy milk").unwrap(),
            ReplCommand::Process("buy milk".to_string())
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_repl_command("show").unwrap(), ReplCommand::Show);
        assert_eq!(parse_repl_command("clear").unwrap(), ReplCommand::Clear);
        assert_eq!(parse_repl_command("?").unwrap(), ReplCommand::Help);
        assert_eq!(parse_repl_command("quit").unwrap(), ReplCommand::Exit);
    }

    #[test]
    fn test_parse_export_path_is_optional() {
        assert_eq!(parse_repl_command("export").unwrap(), ReplCommand::Export(None));
        assert_eq!(
            parse_repl_command("export out.csv").unwrap(),
            ReplCommand::Export(Some(PathBuf::from("out.csv")))
        );
    }

    #[test]
    fn test_parse_requires_arguments() {
        assert!(parse_repl_command("process").is_err());
        assert!(parse_repl_command("import").is_err());
        assert!(parse_repl_command("key   ").is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        match parse_repl_command("frobnicate now") {
            Err(CliError::InvalidInput(msg)) => assert!(msg.contains("frobnicate")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_key_then_process() {
        let mut session = session(r#"[{"Task": "Buy milk"}]"#);
        let mut credential = String::new();

        let result = execute_repl_command(
            ReplCommand::Process("buy milk".into()),
            &mut session,
            &mut credential,
            &formatter(),
        )
        .await;
        assert!(matches!(
            result,
            Err(CliError::Extract(ExtractError::Unauthenticated))
        ));
        assert!(session.table().is_empty());

        execute_repl_command(
            ReplCommand::Key("sk-test".into()),
            &mut session,
            &mut credential,
            &formatter(),
        )
        .await
        .unwrap();
        assert_eq!(credential, "sk-test");

        execute_repl_command(
            ReplCommand::Process("buy milk".into()),
            &mut session,
            &mut credential,
            &formatter(),
        )
        .await
        .unwrap();
        assert_eq!(session.table().len(), 1);
        assert_eq!(
            session.extractor().provider().last_call().unwrap().credential,
            "sk-test"
        );
    }

    #[tokio::test]
    async fn test_failed_process_keeps_table() {
        let mut session = session(r#"[{"Task": "Buy milk"}]"#);
        let mut credential = "sk-test".to_string();

        execute_repl_command(
            ReplCommand::Process("buy milk".into()),
            &mut session,
            &mut credential,
            &formatter(),
        )
        .await
        .unwrap();

        let mut broken = TaskSession::new(Extractor::new(
            MockProvider::new("not json"),
            ExtractorConfig::default(),
        ));
        broken.import(session.table().records().to_vec()).unwrap();

        let result = execute_repl_command(
            ReplCommand::Process("more".into()),
            &mut broken,
            &mut credential,
            &formatter(),
        )
        .await;
        assert!(matches!(
            result,
            Err(CliError::Extract(ExtractError::MalformedResponse { .. }))
        ));
        assert_eq!(broken.table(), session.table());
    }

    #[tokio::test]
    async fn test_clear_and_export_import() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        let mut session = session(r#"[{"Task": "a"}, {"Task": "b"}]"#);
        let mut credential = "sk-test".to_string();
        let formatter = formatter();

        for cmd in [
            ReplCommand::Process("a and b".into()),
            ReplCommand::Export(Some(path.clone())),
            ReplCommand::Clear,
        ] {
            execute_repl_command(cmd, &mut session, &mut credential, &formatter)
                .await
                .unwrap();
        }
        assert!(session.table().is_empty());

        execute_repl_command(
            ReplCommand::Import(path),
            &mut session,
            &mut credential,
            &formatter,
        )
        .await
        .unwrap();
        assert_eq!(session.table().len(), 2);
    }
}
