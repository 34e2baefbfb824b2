//! taskdb CLI - Turn free-form notes into a structured task table.

use clap::Parser;
use taskdb_cli::commands;
use taskdb_cli::repl;
use taskdb_cli::{Cli, CliError, Command, Config, Formatter};
use taskdb_extractor::{Extractor, TaskSession};
use taskdb_llm::OpenAiProvider;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> taskdb_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config, then let flags override it
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    config.apply_overrides(cli.model.clone(), cli.endpoint.clone(), cli.timeout);
    config.validate()?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // A missing key is reported by the extractor on first use
    let credential = cli.api_key.unwrap_or_default();

    // Handle commands
    match cli.command {
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
        Some(Command::Extract(args)) => {
            let mut session = build_session(&config)?;
            commands::execute_extract(args, &mut session, &credential, &formatter).await?;
        }
        None | Some(Command::Repl) => {
            let mut session = build_session(&config)?;
            repl::run_repl(&mut session, credential, &config.settings, &formatter).await?;
        }
    }

    Ok(())
}

fn build_session(config: &Config) -> taskdb_cli::Result<TaskSession<OpenAiProvider>> {
    let provider =
        OpenAiProvider::with_timeout(&config.llm.endpoint, config.llm.request_timeout_secs)
            .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(TaskSession::new(Extractor::new(provider, config.llm.clone())))
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
