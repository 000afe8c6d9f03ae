//! tasklane - lossless checklist task line codec
//!
//! Finds checklist task lines (`- [ ] Call the bank #today ^call`) in text
//! documents, decomposes them into typed fields, lets a board move or archive
//! them, and writes them back so that untouched lines are byte-identical.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`markers`] - Status marker validation and immutable marker sets
//! - [`classify`] - Decides whether a line is a tracked task
//! - [`task`] - Task entity, parse/serialise codec, column and archive mutations
//! - [`columns`] - Column tag table and kebab-case canonicalization
//! - [`document`] - Whole-document task extraction and write-back
//! - [`config`] - Board settings loading and validation
//! - [`error`] - Custom error types and handling
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tasklane::{BoardConfig, Task, TaskContext, is_tracked_task_line};
//!
//! let config = BoardConfig {
//!     columns: vec!["column".to_string()],
//!     ..BoardConfig::default()
//! };
//! let context = Arc::new(config.context().unwrap());
//!
//! let line = "- [ ] Incomplete task #column";
//! assert!(is_tracked_task_line(line, context.ignored_markers()));
//!
//! let mut task = Task::parse(line, "board.md", 0, &context).unwrap();
//! task.archive();
//! assert!(task.done());
//! assert_eq!(task.serialise(), "- [x] Incomplete task #archived");
//! ```

pub mod classify;
pub mod columns;
pub mod config;
pub mod document;
pub mod error;
pub mod markers;
pub mod task;

// Re-export commonly used types
pub use error::{Result, TaskLaneError};

pub use classify::{classify, is_tracked_task_line, LineClass};
pub use columns::{kebab, ColumnTagTable, ARCHIVED_COLUMN};
pub use config::{BoardConfig, BoardScope, ValidationReport};
pub use document::TaskDocument;
pub use markers::{
    validate_done_markers, validate_ignored_markers, validate_markers, MarkerKind, MarkerSet,
    MarkerViolation, DEFAULT_DONE_STATUS_MARKERS, DEFAULT_IGNORED_STATUS_MARKERS,
};
pub use task::{Task, TaskContext, TaskSnapshot};
