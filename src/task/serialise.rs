//! Task line recomposition.

use std::fmt;

use super::Task;

impl Task {
    /// Recompose the task into its text line.
    ///
    /// Layout: `indentation + "- [" + status + "] " + content`, then the
    /// column hashtag, then the block link. A column that is unchanged since
    /// parsing goes back exactly where it was written; a new column is
    /// appended after the inline content.
    #[must_use]
    pub fn serialise(&self) -> String {
        let mut body = self.content.clone();

        if let Some(column) = &self.column {
            match &self.column_slot {
                Some(slot) if slot.column == *column => {
                    body.insert_str(slot.offset, &slot.removed);
                }
                _ => {
                    if !body.is_empty() && !body.ends_with(char::is_whitespace) {
                        body.push(' ');
                    }
                    body.push('#');
                    body.push_str(&self.context.column_table().hashtag_for(column));
                }
            }
        }

        if let Some(link) = &self.block_link {
            if link.separator.is_empty() && !body.is_empty() {
                body.push(' ');
            } else {
                body.push_str(&link.separator);
            }
            body.push('^');
            body.push_str(&link.id);
        }

        format!("{}- [{}] {}", self.indentation, self.status, body)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialise())
    }
}
