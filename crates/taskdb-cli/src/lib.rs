//! taskdb CLI library.
//!
//! This library provides the presentation layer for taskdb: argument parsing,
//! configuration management, command execution, table rendering and CSV export.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
