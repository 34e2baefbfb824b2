//! taskdb Domain Layer
//!
//! This crate contains the core types shared by every other taskdb crate.
//! It keeps its dependencies to fundamental primitives (calendar dates and
//! the async trait shim) and defines the value objects and trait interfaces
//! that the infrastructure layers depend upon.
//!
//! ## Key Concepts
//!
//! - **TaskRecord**: One structured task extracted from free text
//! - **Category / Priority**: Closed sets every record is drawn from
//! - **TaskTable**: The ordered, session-owned collection of records
//! - **CompletionProvider**: Boundary to the upstream language model service
//!
//! ## Architecture
//!
//! - Pure business types only
//! - Network and presentation code live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod table;
pub mod task;
pub mod traits;

// Re-exports for convenience
pub use table::TaskTable;
pub use task::{
    parse_due_date, Category, ParseFieldError, Priority, RawTaskFields, TaskRecord, COLUMNS,
    DATE_FORMAT, DEFAULT_STATUS,
};
pub use traits::{CompletionProvider, CompletionRequest, DETERMINISTIC_TEMPERATURE};
