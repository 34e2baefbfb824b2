//! Command implementations.

pub mod config;
pub mod export;
pub mod extract;

pub use self::config::execute_config;
pub use self::export::{execute_export, execute_import};
pub use self::extract::execute_extract;
