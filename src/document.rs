//! Document-level task extraction and write-back.
//!
//! A [`TaskDocument`] holds the lines of one text file together with their
//! original terminators, so rendering an untouched document reproduces it
//! byte for byte. Tasks are found by running the classifier and codec over
//! every line; mutated tasks are written back into their rows.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tasklane::columns::ColumnTagTable;
//! use tasklane::document::TaskDocument;
//! use tasklane::task::TaskContext;
//!
//! let context = Arc::new(TaskContext::new(
//!     ColumnTagTable::from_columns(["Today"]).unwrap(),
//! ));
//! let mut doc = TaskDocument::new("todo.md", "# Todo\n- [ ] Write docs #today\n");
//!
//! let mut tasks = doc.tasks(&context);
//! assert_eq!(tasks.len(), 1);
//!
//! tasks[0].archive();
//! doc.replace(&tasks[0]).unwrap();
//! assert_eq!(doc.render(), "# Todo\n- [x] Write docs #archived\n");
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::classify::{classify, LineClass};
use crate::error::{Result, TaskLaneError};
use crate::task::{Task, TaskContext};

/// Terminator that followed a line in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
    None,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    text: String,
    ending: LineEnding,
}

/// The lines of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDocument {
    path: PathBuf,
    lines: Vec<Line>,
}

impl TaskDocument {
    /// Split `text` into lines, remembering each terminator.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        let lines = text
            .split_inclusive('\n')
            .map(|raw| {
                if let Some(text) = raw.strip_suffix("\r\n") {
                    Line {
                        text: text.to_string(),
                        ending: LineEnding::CrLf,
                    }
                } else if let Some(text) = raw.strip_suffix('\n') {
                    Line {
                        text: text.to_string(),
                        ending: LineEnding::Lf,
                    }
                } else {
                    Line {
                        text: raw.to_string(),
                        ending: LineEnding::None,
                    }
                }
            })
            .collect();

        Self {
            path: path.into(),
            lines,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of the line at `row`, without its terminator.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|line| line.text.as_str())
    }

    /// Every tracked task, in document order.
    #[must_use]
    pub fn tasks(&self, context: &Arc<TaskContext>) -> Vec<Task> {
        let tasks: Vec<Task> = (0..self.lines.len())
            .filter_map(|row| self.task_at(row, context))
            .collect();

        debug!(
            "Found {} task(s) in {} ({} lines)",
            tasks.len(),
            self.path.display(),
            self.lines.len()
        );
        tasks
    }

    /// The tracked task at `row`, if that line is one.
    #[must_use]
    pub fn task_at(&self, row: usize, context: &Arc<TaskContext>) -> Option<Task> {
        let line = &self.lines.get(row)?.text;

        match classify(line, context.ignored_markers()) {
            LineClass::Tracked(_) => match Task::parse(line, &self.path, row, context) {
                Ok(task) => Some(task),
                Err(e) => {
                    debug!("Row {} of {} not parsed: {}", row, self.path.display(), e);
                    None
                }
            },
            LineClass::NotTask => None,
            other => {
                trace!("Row {} of {} rejected: {:?}", row, self.path.display(), other);
                None
            }
        }
    }

    /// Write `task` back into its row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLaneError::RowOutOfRange`] if the row no longer exists.
    pub fn replace(&mut self, task: &Task) -> Result<()> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(task.row())
            .ok_or(TaskLaneError::RowOutOfRange {
                row: task.row(),
                len,
            })?;

        line.text = task.serialise();
        Ok(())
    }

    /// Reassemble the document text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(line.ending.as_str());
        }
        out
    }
}
