//! taskdb Extractor
//!
//! Converts free-form text into structured task records using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Text + API key → Extractor → LLM → JSON → TaskRecords → TaskSession's TaskTable
//! ```
//!
//! # Key Features
//!
//! - **Text-to-Tasks Conversion**: One prompt, one request, one parsed batch
//! - **Typed Failures**: Every failure is an [`ExtractError`] value
//! - **Session State**: [`TaskSession`] owns the table; nothing is global
//!
//! # Example Usage
//!
//! ```no_run
//! use taskdb_extractor::{Extractor, ExtractorConfig, TaskSession};
//! use taskdb_llm::OpenAiProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractorConfig::default();
//! let provider = OpenAiProvider::with_timeout(&config.endpoint, config.request_timeout_secs)?;
//! let mut session = TaskSession::new(Extractor::new(provider, config));
//!
//! let added = session
//!     .process("Finish report by Friday, high priority", "sk-...")
//!     .await?;
//!
//! println!("Added {} tasks", added);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod session;

#[cfg(test)]
mod tests;

pub use config::{ExtractorConfig, DEFAULT_MODEL};
pub use error::ExtractError;
pub use extractor::Extractor;
pub use parser::parse_llm_response;
pub use prompt::PromptBuilder;
pub use session::TaskSession;
