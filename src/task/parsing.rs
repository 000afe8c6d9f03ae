//! Task line decomposition.
//!
//! Splits a task line into indentation, status, content, column and block
//! link while remembering exactly what was removed from where, so that
//! serialisation can put it back.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::{task_id, BlockLink, ColumnSlot, Task, TaskContext};
use crate::columns::{kebab, ColumnTagTable, ARCHIVED_COLUMN};
use crate::error::{Result, TaskLaneError};

// ============================================================================
// Patterns
// ============================================================================

/// `indentation`, `status`, `body`. Status may be empty or several chars.
fn task_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([ \t]*)- \[([^\[\]]*)\] (.*)$").expect("task line regex is valid")
    })
}

/// A whole word that is a single hashtag.
fn hashtag_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#([\p{L}\p{N}_/-]+)$").expect("hashtag regex is valid"))
}

/// Hashtags anywhere in content, preceded by start of text or whitespace.
fn inline_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|\s)#([\p{L}\p{N}_/-]+)").expect("inline tag regex is valid")
    })
}

fn block_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\^([A-Za-z0-9-]+)$").expect("block link regex is valid"))
}

// ============================================================================
// Decomposition
// ============================================================================

impl Task {
    /// Decompose a task line.
    ///
    /// Call this on lines accepted by
    /// [`is_tracked_task_line`](crate::classify::is_tracked_task_line). Bracket
    /// contents that are not exactly one character are tolerated and never
    /// count as done.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLaneError::NotATask`] if the line lacks the `- [c] `
    /// checkbox shape.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use tasklane::columns::ColumnTagTable;
    /// use tasklane::task::{Task, TaskContext};
    ///
    /// let table = ColumnTagTable::from_columns(["column"]).unwrap();
    /// let context = Arc::new(TaskContext::new(table));
    ///
    /// let line = "- [ ] Something #tag #column";
    /// let task = Task::parse(line, "notes.md", 0, &context).unwrap();
    /// assert_eq!(task.content(), "Something #tag");
    /// assert_eq!(task.column(), Some("column"));
    /// assert!(task.has_tag("tag"));
    /// assert_eq!(task.serialise(), line);
    /// ```
    pub fn parse(
        line: &str,
        path: impl Into<PathBuf>,
        row: usize,
        context: &Arc<TaskContext>,
    ) -> Result<Self> {
        let caps = task_line_regex()
            .captures(line)
            .ok_or_else(|| TaskLaneError::NotATask {
                line: line.to_string(),
            })?;

        let indentation = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let status = caps.get(2).map_or("", |m| m.as_str()).to_string();
        let body = caps.get(3).map_or("", |m| m.as_str());

        let (text, block_link) = split_block_link(body);
        let (content, column) = extract_column(text, context.column_table());

        let mut tags = collect_tags(&content);
        if let Some((_, key)) = &column {
            tags.insert(key.clone());
        }

        let path = path.into();
        let (column, column_slot) = match column {
            Some((slot, _)) => (Some(slot.column.clone()), Some(slot)),
            None => (None, None),
        };

        Ok(Self {
            id: task_id(&path, row),
            path,
            row,
            indentation,
            status,
            content,
            tags,
            column,
            column_slot,
            block_link,
            context: Arc::clone(context),
        })
    }
}

/// Byte ranges of the whitespace-delimited words of `text`.
fn word_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = None;

    for (index, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(begin) = start.take() {
                spans.push(begin..index);
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }

    if let Some(begin) = start {
        spans.push(begin..text.len());
    }

    spans
}

/// Strip a `^anchor` that ends the body, with the whitespace before it.
fn split_block_link(body: &str) -> (&str, Option<BlockLink>) {
    let spans = word_spans(body);
    let Some(last) = spans.last() else {
        return (body, None);
    };
    if last.end != body.len() {
        return (body, None);
    }

    let Some(caps) = block_link_regex().captures(&body[last.clone()]) else {
        return (body, None);
    };

    let kept_end = spans
        .len()
        .checked_sub(2)
        .map_or(0, |previous| spans[previous].end);

    let link = BlockLink {
        id: caps[1].to_string(),
        separator: body[kept_end..last.start].to_string(),
    };

    (&body[..kept_end], Some(link))
}

/// Resolve a hashtag to `(column display, tag key)`.
fn resolve_column(tag: &str, table: &ColumnTagTable) -> Option<(String, String)> {
    if let Some(display) = table.resolve_tag(tag) {
        return Some((display.to_string(), kebab(tag)));
    }

    (kebab(tag) == ARCHIVED_COLUMN)
        .then(|| (ARCHIVED_COLUMN.to_string(), ARCHIVED_COLUMN.to_string()))
}

/// Remove the hashtag word that names the task's column.
///
/// `#archived` wins wherever it appears; otherwise the first column hashtag
/// is taken. The word leaves with the whitespace run before it, or the run
/// after it when it is the first word, so no double space is introduced.
fn extract_column(text: &str, table: &ColumnTagTable) -> (String, Option<(ColumnSlot, String)>) {
    let spans = word_spans(text);

    let mut candidates: Vec<(usize, String, String)> = spans
        .iter()
        .enumerate()
        .filter_map(|(index, span)| {
            let caps = hashtag_word_regex().captures(&text[span.clone()])?;
            let (column, key) = resolve_column(&caps[1], table)?;
            Some((index, column, key))
        })
        .collect();

    let chosen = candidates
        .iter()
        .position(|(_, column, _)| column == ARCHIVED_COLUMN)
        .or_else(|| (!candidates.is_empty()).then_some(0));

    if let Some(choice) = chosen {
        let (index, column, key) = candidates.swap_remove(choice);
        let span = &spans[index];

        let cut = if index > 0 {
            spans[index - 1].end..span.end
        } else if let Some(next) = spans.get(1) {
            span.start..next.start
        } else {
            span.start..text.len()
        };

        let mut content = text.to_string();
        content.replace_range(cut.clone(), "");

        let slot = ColumnSlot {
            offset: cut.start,
            removed: text[cut].to_string(),
            column,
        };
        return (content, Some((slot, key)));
    }

    (text.to_string(), None)
}

/// Tag names written inline in `content`.
fn collect_tags(content: &str) -> BTreeSet<String> {
    inline_tag_regex()
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
