//! Column tag resolution.
//!
//! A board column is written into a task line as a hashtag, e.g. the
//! `#next-week` in `- [ ] Call the bank #next-week`. The [`ColumnTagTable`]
//! maps those kebab-case tag keys to the display names users configure and
//! back again.

use std::collections::HashMap;

use crate::error::{Result, TaskLaneError};

/// Column assigned by `Task::archive`. Never looked up in a table.
pub const ARCHIVED_COLUMN: &str = "archived";

/// Canonicalize free text into a kebab-case tag key.
///
/// Lowercases, splits `camelCase` boundaries and collapses runs of
/// whitespace and underscores into a single `-`.
///
/// ```
/// use tasklane::columns::kebab;
///
/// assert_eq!(kebab("Next week"), "next-week");
/// assert_eq!(kebab("inProgress"), "in-progress");
/// assert_eq!(kebab("waiting_on  them"), "waiting-on-them");
/// ```
#[must_use]
pub fn kebab(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut previous: Option<char> = None;
    let mut pending_separator = false;

    for c in input.trim().chars() {
        if c.is_whitespace() || c == '_' {
            pending_separator = true;
            previous = None;
            continue;
        }

        if pending_separator {
            out.push('-');
            pending_separator = false;
        } else if c.is_uppercase()
            && previous.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
        {
            out.push('-');
        }

        out.extend(c.to_lowercase());
        previous = Some(c);
    }

    out
}

// ============================================================================
// Column Tag Table
// ============================================================================

/// Bidirectional mapping between column tag keys and display names.
///
/// Keys are unique kebab-case strings. Both directions are built together so
/// lookups never re-canonicalize the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTagTable {
    /// `(key, display)` in configuration order
    entries: Vec<(String, String)>,
    by_key: HashMap<String, usize>,
    by_display: HashMap<String, usize>,
}

impl ColumnTagTable {
    /// An empty table: no hashtag resolves to a column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from configured column display names.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLaneError::InvalidConfig`] when a name is blank, when two
    /// names share a kebab key, or when a name claims the reserved
    /// `archived` key.
    ///
    /// ```
    /// use tasklane::columns::ColumnTagTable;
    ///
    /// let table = ColumnTagTable::from_columns(["Today", "Next week"]).unwrap();
    /// assert_eq!(table.resolve_tag("next-week"), Some("Next week"));
    /// assert_eq!(table.tag_for("Today"), Some("today"));
    /// ```
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for column in columns {
            table.insert(column.as_ref())?;
        }
        Ok(table)
    }

    /// Add one column, keyed by `kebab(display)`.
    ///
    /// # Errors
    ///
    /// See [`ColumnTagTable::from_columns`].
    pub fn insert(&mut self, display: &str) -> Result<()> {
        let display = display.trim();
        if display.is_empty() {
            return Err(TaskLaneError::invalid_config(
                "columns",
                "column names cannot be empty",
            ));
        }

        let key = kebab(display);
        if key == ARCHIVED_COLUMN {
            return Err(TaskLaneError::invalid_config(
                "columns",
                format!("'{display}' uses the reserved tag #{ARCHIVED_COLUMN}"),
            ));
        }
        if let Some(&existing) = self.by_key.get(&key) {
            return Err(TaskLaneError::invalid_config(
                "columns",
                format!(
                    "'{display}' and '{}' both map to #{key}",
                    self.entries[existing].1
                ),
            ));
        }

        let index = self.entries.len();
        self.by_key.insert(key.clone(), index);
        self.by_display.insert(display.to_string(), index);
        self.entries.push((key, display.to_string()));
        Ok(())
    }

    /// Resolve a hashtag (without `#`) to a column display name.
    ///
    /// The tag is canonicalized first, so `#NextWeek` and `#next-week` both
    /// find the "Next week" column.
    #[must_use]
    pub fn resolve_tag(&self, tag: &str) -> Option<&str> {
        self.by_key
            .get(&kebab(tag))
            .map(|&index| self.entries[index].1.as_str())
    }

    /// The tag key for a column display name.
    #[must_use]
    pub fn tag_for(&self, display: &str) -> Option<&str> {
        self.by_display
            .get(display)
            .map(|&index| self.entries[index].0.as_str())
    }

    /// The tag key to write for `column`.
    ///
    /// Falls back to the `archived` sentinel verbatim, then to `kebab(column)`
    /// for names the table does not know.
    #[must_use]
    pub fn hashtag_for(&self, column: &str) -> String {
        match self.tag_for(column) {
            Some(key) => key.to_string(),
            None if column == ARCHIVED_COLUMN => ARCHIVED_COLUMN.to_string(),
            None => kebab(column),
        }
    }

    /// Iterate `(key, display)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, display)| (key.as_str(), display.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
