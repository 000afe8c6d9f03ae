//! Task entity and line codec.
//!
//! A [`Task`] is one tracked checklist line decomposed into typed fields:
//!
//! ```text
//! "  - [x] Call the bank #money #today ^call-bank"
//!  ├─┘   │  └──────┬───────────┘ └─┬──┘ └───┬───┘
//!  │     │         content        column  block_link
//!  │     status
//!  indentation
//! ```
//!
//! Parsing and serialising are inverses: a freshly parsed task serialises
//! back to its source line byte for byte. Mutations ([`Task::set_column`],
//! [`Task::archive`]) touch only the fields they own.

mod parsing;
mod serialise;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::columns::{ColumnTagTable, ARCHIVED_COLUMN};
use crate::markers::{MarkerSet, FALLBACK_DONE_MARKER};

// ============================================================================
// Task Context
// ============================================================================

/// Board configuration captured by every parsed task.
///
/// Immutable once built; share it between tasks with an [`Arc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContext {
    column_table: ColumnTagTable,
    consolidate_tags: bool,
    done_markers: MarkerSet,
    ignored_markers: MarkerSet,
}

impl TaskContext {
    /// Context with the given columns and default marker sets.
    #[must_use]
    pub fn new(column_table: ColumnTagTable) -> Self {
        Self {
            column_table,
            consolidate_tags: false,
            done_markers: MarkerSet::default_done(),
            ignored_markers: MarkerSet::default_ignored(),
        }
    }

    #[must_use]
    pub fn with_done_markers(mut self, done_markers: MarkerSet) -> Self {
        self.done_markers = done_markers;
        self
    }

    #[must_use]
    pub fn with_ignored_markers(mut self, ignored_markers: MarkerSet) -> Self {
        self.ignored_markers = ignored_markers;
        self
    }

    /// Set the consolidate-tags display hint. It never changes serialisation.
    #[must_use]
    pub fn with_consolidate_tags(mut self, consolidate_tags: bool) -> Self {
        self.consolidate_tags = consolidate_tags;
        self
    }

    #[must_use]
    pub fn column_table(&self) -> &ColumnTagTable {
        &self.column_table
    }

    #[must_use]
    pub fn consolidate_tags(&self) -> bool {
        self.consolidate_tags
    }

    #[must_use]
    pub fn done_markers(&self) -> &MarkerSet {
        &self.done_markers
    }

    #[must_use]
    pub fn ignored_markers(&self) -> &MarkerSet {
        &self.ignored_markers
    }
}

impl Default for TaskContext {
    fn default() -> Self {
        Self::new(ColumnTagTable::new())
    }
}

// ============================================================================
// Layout bookkeeping
// ============================================================================

/// Where the column hashtag sat in the original body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnSlot {
    /// Byte offset into `content` where `removed` was cut out
    offset: usize,
    /// The hashtag word plus the one whitespace run taken with it
    removed: String,
    /// Column the hashtag resolved to
    column: String,
}

/// Trailing `^anchor` and the whitespace that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockLink {
    id: String,
    separator: String,
}

// ============================================================================
// Task
// ============================================================================

/// One recognized checklist line.
#[derive(Debug, Clone)]
pub struct Task {
    id: String,
    path: PathBuf,
    row: usize,
    indentation: String,
    status: String,
    content: String,
    tags: BTreeSet<String>,
    column: Option<String>,
    column_slot: Option<ColumnSlot>,
    block_link: Option<BlockLink>,
    context: Arc<TaskContext>,
}

impl Task {
    /// Stable identifier derived from the source path and row.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw 0-based line offset within the source document.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub fn indentation(&self) -> &str {
        &self.indentation
    }

    /// Raw checkbox contents.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The checkbox character, when the checkbox holds exactly one.
    #[must_use]
    pub fn status_char(&self) -> Option<char> {
        let mut chars = self.status.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// Whether the status character is a configured done marker.
    #[must_use]
    pub fn done(&self) -> bool {
        self.status_char()
            .is_some_and(|c| self.context.done_markers.contains(c))
    }

    /// Descriptive text without the column hashtag or block anchor.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Tag names found in the content plus the column tag key.
    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    #[must_use]
    pub fn block_link(&self) -> Option<&str> {
        self.block_link.as_ref().map(|link| link.id.as_str())
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.column.as_deref() == Some(ARCHIVED_COLUMN)
    }

    #[must_use]
    pub fn consolidate_tags(&self) -> bool {
        self.context.consolidate_tags
    }

    #[must_use]
    pub fn context(&self) -> &Arc<TaskContext> {
        &self.context
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Move the task to another column.
    ///
    /// Only the appended column hashtag changes; content, tags, status and
    /// block link are untouched.
    pub fn set_column(&mut self, column: impl Into<String>) {
        self.column = Some(column.into());
    }

    /// Remove the column assignment.
    pub fn clear_column(&mut self) {
        self.column = None;
    }

    /// Archive the task.
    ///
    /// Moves it to the `archived` column and marks it done. A status that is
    /// already a done marker is kept as written; any other status becomes the
    /// first configured done marker.
    pub fn archive(&mut self) {
        self.column = Some(ARCHIVED_COLUMN.to_string());

        if !self.done() {
            let marker = self
                .context
                .done_markers
                .first()
                .unwrap_or(FALLBACK_DONE_MARKER);
            self.status = marker.to_string();
        }
    }

    /// Serializable view of the task.
    #[must_use]
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id.clone(),
            path: self.path.clone(),
            row: self.row,
            status: self.status.clone(),
            done: self.done(),
            content: self.content.clone(),
            tags: self.tags.iter().cloned().collect(),
            column: self.column.clone(),
            block_link: self.block_link().map(str::to_string),
            line: self.serialise(),
        }
    }
}

/// Compute the stable id for a task at `row` of `path`.
pub(crate) fn task_id(path: &Path, row: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hasher.update(b":");
    hasher.update(row.to_le_bytes());
    hex::encode(&hasher.finalize()[..12])
}

// ============================================================================
// Snapshot
// ============================================================================

/// Plain-data copy of a task for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: String,
    pub path: PathBuf,
    pub row: usize,
    pub status: String,
    pub done: bool,
    pub content: String,
    pub tags: Vec<String>,
    pub column: Option<String>,
    pub block_link: Option<String>,
    pub line: String,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn context(done: &str) -> Arc<TaskContext> {
        Arc::new(
            TaskContext::new(ColumnTagTable::from_columns(["column"]).unwrap())
                .with_done_markers(MarkerSet::done(done).unwrap()),
        )
    }

    fn parse(line: &str, done: &str) -> Task {
        Task::parse(line, "/", 0, &context(done)).unwrap()
    }

    // ========================================================================
    // Done Status Tests
    // ========================================================================

    #[test]
    fn test_custom_done_marker() {
        let task = parse("- [✓] Custom done marker #tag", "xX✓");
        assert!(task.done());
        assert_eq!(task.content(), "Custom done marker #tag");
    }

    #[test]
    fn test_unconfigured_marker_is_not_done() {
        let task = parse("- [✓] Custom done marker #tag", "xX");
        assert!(!task.done());
        assert_eq!(task.status_char(), Some('✓'));
    }

    #[test]
    fn test_emoji_done_markers() {
        assert!(parse("- [👍] Multi-codepoint emoji #tag", "xX👍").done());
        assert!(parse("- [✅] Task with checkmark #tag", "xX✅").done());
        assert!(parse("- [🚀] Rocket emoji #tag", "xX🚀").done());
    }

    #[test]
    fn test_special_characters_as_markers() {
        for marker in ['*', '+', '?', '.', '\\', 'é', '\u{200B}'] {
            let line = format!("- [{marker}] Special #tag");
            let task = parse(&line, &format!("xX{marker}"));
            assert!(task.done(), "{marker:?}");
        }
    }

    #[test]
    fn test_unknown_status_is_not_done() {
        for line in [
            "- [z] Task with unknown char #tag",
            "- [1] Task with number #tag",
            "- [\t] Task with tab #tag",
            "- [ ] Open",
        ] {
            assert!(!parse(line, "xX").done(), "{line:?}");
        }
    }

    #[test]
    fn test_multi_character_status_is_not_done() {
        let task = parse("- [abc] Task with multi-char status #tag", "xX");
        assert!(!task.done());
        assert_eq!(task.status(), "abc");
        assert_eq!(task.status_char(), None);

        let task = parse("- [  ] Task with spaces #tag", "xX");
        assert!(!task.done());

        let task = parse("- [] Empty", "xX");
        assert!(!task.done());
    }

    #[test]
    fn test_case_sensitive_done() {
        assert!(!parse("- [X] Uppercase done marker #tag", "x").done());
        assert!(parse("- [x] Lowercase done marker #tag", "x").done());
    }

    // ========================================================================
    // Column Mutation Tests
    // ========================================================================

    #[test]
    fn test_set_column_appends_before_block_link() {
        let mut task = parse("- [ ] Something #tag ^link-link", "xX");
        task.set_column("column");
        assert_eq!(task.serialise(), "- [ ] Something #tag #column ^link-link");
        assert_eq!(task.content(), "Something #tag");
        assert_eq!(task.block_link(), Some("link-link"));
    }

    #[test]
    fn test_set_column_moves_existing_tag_to_end() {
        let ctx = Arc::new(TaskContext::new(
            ColumnTagTable::from_columns(["Today", "Later"]).unwrap(),
        ));
        let mut task = Task::parse("- [ ] A #today b", "/", 0, &ctx).unwrap();
        assert_eq!(task.column(), Some("Today"));
        task.set_column("Later");
        assert_eq!(task.serialise(), "- [ ] A b #later");
        task.set_column("Today");
        assert_eq!(task.serialise(), "- [ ] A #today b");
    }

    #[test]
    fn test_clear_column() {
        let mut task = parse("- [ ] Something #column", "xX");
        task.clear_column();
        assert_eq!(task.column(), None);
        assert_eq!(task.serialise(), "- [ ] Something");
        assert!(task.has_tag("column"));
    }

    #[test]
    fn test_set_column_leaves_status_and_tags() {
        let mut task = parse("- [?] Something #tag", "xX");
        task.set_column("column");
        assert_eq!(task.status(), "?");
        assert_eq!(
            task.tags().iter().cloned().collect::<Vec<_>>(),
            vec!["tag".to_string()]
        );
    }

    // ========================================================================
    // Archive Tests
    // ========================================================================

    #[test]
    fn test_archive_keeps_existing_done_markers() {
        for (line, expected) in [
            (
                "- [X] Already done task #column",
                "- [X] Already done task #archived",
            ),
            (
                "- [x] Already done task #column",
                "- [x] Already done task #archived",
            ),
        ] {
            let mut task = parse(line, "xX");
            task.archive();
            assert!(task.done());
            assert_eq!(task.column(), Some("archived"));
            assert_eq!(task.serialise(), expected);
        }
    }

    #[test]
    fn test_archive_keeps_custom_done_marker() {
        let mut task = parse("- [✓] Custom done marker task #column", "xX✓");
        task.archive();
        assert_eq!(task.serialise(), "- [✓] Custom done marker task #archived");

        let mut task = parse("- [✅] Emoji done marker task #column", "xX✅");
        task.archive();
        assert_eq!(task.serialise(), "- [✅] Emoji done marker task #archived");
    }

    #[test]
    fn test_archive_applies_first_done_marker() {
        let mut task = parse("- [ ] Incomplete task #column", "xX");
        task.archive();
        assert!(task.done());
        assert!(task.is_archived());
        assert_eq!(task.serialise(), "- [x] Incomplete task #archived");

        let mut task = parse("- [?] Unknown status task #column", "xX");
        task.archive();
        assert_eq!(task.serialise(), "- [x] Unknown status task #archived");

        let mut task = parse("- [ ] Custom first #column", "✓x");
        task.archive();
        assert_eq!(task.serialise(), "- [✓] Custom first #archived");
    }

    #[test]
    fn test_archive_is_idempotent() {
        let mut once = parse("- [ ] Task #tag #column ^anchor", "xX");
        once.archive();
        let mut twice = once.clone();
        twice.archive();
        assert_eq!(once.serialise(), twice.serialise());
        assert_eq!(twice.serialise(), "- [x] Task #tag #archived ^anchor");
    }

    #[test]
    fn test_archive_survives_reload_with_other_column_tags() {
        let ctx = Arc::new(TaskContext::new(
            ColumnTagTable::from_columns(["Today", "Later"]).unwrap(),
        ));
        let mut task = Task::parse("- [ ] Plan #today #later", "/", 0, &ctx).unwrap();
        task.archive();
        let saved = task.serialise();
        assert_eq!(saved, "- [x] Plan #later #archived");

        let reloaded = Task::parse(&saved, "/", 0, &ctx).unwrap();
        assert!(reloaded.is_archived());
        assert_eq!(reloaded.column(), Some(ARCHIVED_COLUMN));
        assert_eq!(reloaded.content(), "Plan #later");
        assert_eq!(reloaded.serialise(), saved);
    }

    #[test]
    fn test_archive_after_trailing_whitespace_adds_no_double_space() {
        let mut task = parse("- [ ] a # ", "xX");
        task.archive();
        assert_eq!(task.serialise(), "- [x] a # #archived");
    }

    #[test]
    fn test_archive_leaves_other_fields() {
        let mut task = parse("\t- [ ] Keep me #tag ^id-1", "xX");
        task.archive();
        assert_eq!(task.indentation(), "\t");
        assert_eq!(task.content(), "Keep me #tag");
        assert_eq!(task.block_link(), Some("id-1"));
        assert!(task.has_tag("tag"));
    }

    // ========================================================================
    // Identity Tests
    // ========================================================================

    #[test]
    fn test_id_is_stable_per_path_and_row() {
        let ctx = context("xX");
        let a = Task::parse("- [ ] A", "notes/a.md", 3, &ctx).unwrap();
        let b = Task::parse("- [x] B", "notes/a.md", 3, &ctx).unwrap();
        let c = Task::parse("- [ ] A", "notes/a.md", 4, &ctx).unwrap();
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(a.id().len(), 24);
    }

    #[test]
    fn test_snapshot_carries_fields() {
        let task = parse("- [x] Ship #release #column ^ship", "xX");
        let snapshot = task.snapshot();
        assert!(snapshot.done);
        assert_eq!(snapshot.column.as_deref(), Some("column"));
        assert_eq!(snapshot.block_link.as_deref(), Some("ship"));
        assert_eq!(snapshot.tags, vec!["column", "release"]);
        assert_eq!(snapshot.line, "- [x] Ship #release #column ^ship");
    }

    #[test]
    fn test_consolidate_tags_is_captured_but_inert() {
        let ctx = Arc::new(
            TaskContext::new(ColumnTagTable::from_columns(["column"]).unwrap())
                .with_consolidate_tags(true),
        );
        let line = "- [ ] Something #tag #column";
        let task = Task::parse(line, "/", 0, &ctx).unwrap();
        assert!(task.consolidate_tags());
        assert_eq!(task.serialise(), line);
    }
}
