//! Task line classification.
//!
//! Decides whether a raw line is a checklist task this crate should track.
//! A tracked line looks like `- [c] text`: optional leading spaces or tabs,
//! a dash, one space, a checkbox holding exactly one Unicode scalar value,
//! one space, then anything.
//!
//! Lines that merely resemble a checkbox are rejected:
//!
//! - `- [[x]]` is a wikilink in a list item
//! - `- [x](foo)` is a markdown hyperlink
//! - `- [-] text` when `-` is a configured ignored marker

use std::sync::OnceLock;

use regex::Regex;

use crate::markers::MarkerSet;

/// Matches the list-item prefix up to and including the opening bracket.
fn checkbox_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ \t]*- \[").expect("checkbox prefix regex is valid"))
}

/// Outcome of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// A tracked task with this status character.
    Tracked(char),
    /// The status character is a configured ignored marker.
    Ignored(char),
    /// `- [[...` wikilink, not a checkbox.
    Backlink,
    /// `- [c](...)` markdown link, not a checkbox.
    Hyperlink,
    /// Anything else.
    NotTask,
}

impl LineClass {
    #[must_use]
    pub fn is_tracked(self) -> bool {
        matches!(self, Self::Tracked(_))
    }
}

/// Classify `line` against the ignored marker set.
#[must_use]
pub fn classify(line: &str, ignored: &MarkerSet) -> LineClass {
    let Some(prefix) = checkbox_prefix_regex().find(line) else {
        return LineClass::NotTask;
    };

    let mut rest = line[prefix.end()..].chars();

    let status = match rest.next() {
        Some('[') => return LineClass::Backlink,
        Some(']') | None => return LineClass::NotTask,
        Some(c) => c,
    };

    if rest.next() != Some(']') {
        return LineClass::NotTask;
    }

    match rest.next() {
        Some(' ') => {}
        Some('(') => return LineClass::Hyperlink,
        _ => return LineClass::NotTask,
    }

    if !ignored.is_empty() && ignored.contains(status) {
        return LineClass::Ignored(status);
    }

    LineClass::Tracked(status)
}

/// Whether `line` is a task line that should be tracked.
///
/// ```
/// use tasklane::classify::is_tracked_task_line;
/// use tasklane::markers::MarkerSet;
///
/// let ignored = MarkerSet::ignored("-~").unwrap();
/// assert!(is_tracked_task_line("- [ ] Buy milk", &ignored));
/// assert!(is_tracked_task_line("- [x] Done already", &ignored));
/// assert!(!is_tracked_task_line("- [-] Cancelled", &ignored));
/// assert!(!is_tracked_task_line("- [[x]]", &ignored));
/// assert!(!is_tracked_task_line("- [x](foo)", &ignored));
/// ```
#[must_use]
pub fn is_tracked_task_line(line: &str, ignored: &MarkerSet) -> bool {
    let class = classify(line, ignored);
    if !class.is_tracked() {
        tracing::trace!("Skipping line {:?}: {:?}", line, class);
    }
    class.is_tracked()
}
