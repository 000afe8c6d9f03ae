//! Status marker validation and marker sets.
//!
//! A status marker is the single character written inside a checkbox,
//! e.g. the `x` in `- [x] Ship it`. Users configure two sets of them:
//!
//! - **done** markers, which mark a task as complete (default `xX`)
//! - **ignored** markers, which remove a line from tracking (default empty)
//!
//! Marker strings are validated per Unicode scalar value, so an emoji such as
//! `🚀` occupies a single position even though it is several UTF-8 bytes.
//!
//! # Example
//!
//! ```
//! use tasklane::markers::{validate_markers, MarkerKind, MarkerSet};
//!
//! assert!(validate_markers("xX✓", MarkerKind::Done).is_empty());
//!
//! let errors = validate_markers("x X", MarkerKind::Done);
//! assert_eq!(errors[0].to_string(), "Marker at position 2 is whitespace");
//!
//! let done = MarkerSet::new("xX✓", MarkerKind::Done).unwrap();
//! assert!(done.contains('✓'));
//! assert_eq!(done.first(), Some('x'));
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskLaneError};

/// Default done markers.
pub const DEFAULT_DONE_STATUS_MARKERS: &str = "xX";

/// Default ignored markers (ignore nothing).
pub const DEFAULT_IGNORED_STATUS_MARKERS: &str = "";

/// Status written by `archive()` when the done set has no members to offer.
pub(crate) const FALLBACK_DONE_MARKER: char = 'x';

// ============================================================================
// Marker Kind
// ============================================================================

/// Which configured marker set a string belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Markers that complete a task.
    Done,
    /// Markers that exclude a line from tracking.
    Ignored,
}

impl MarkerKind {
    /// Whether an empty marker string is rejected for this kind.
    #[must_use]
    pub fn requires_non_empty(self) -> bool {
        matches!(self, Self::Done)
    }

    fn title(self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::Ignored => "Ignored",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::Ignored => write!(f, "ignored"),
        }
    }
}

// ============================================================================
// Violations
// ============================================================================

/// One rule broken by a marker string.
///
/// Positions are 1-based and count Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerViolation {
    /// The string is empty but the kind requires at least one marker.
    Empty { kind: MarkerKind },
    /// The character at `position` is whitespace.
    Whitespace { position: usize },
    /// The character at `position` is a control character.
    Control { position: usize },
    /// `marker` already appeared before `position`.
    Duplicate { marker: char, position: usize },
}

impl MarkerViolation {
    /// Position of the offending character, if the violation has one.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Empty { .. } => None,
            Self::Whitespace { position }
            | Self::Control { position }
            | Self::Duplicate { position, .. } => Some(*position),
        }
    }
}

impl fmt::Display for MarkerViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { kind } => write!(f, "{} status markers cannot be empty", kind.title()),
            Self::Whitespace { position } => {
                write!(f, "Marker at position {position} is whitespace")
            }
            Self::Control { position } => {
                write!(f, "Marker at position {position} is a control character")
            }
            Self::Duplicate { marker, position } => {
                write!(f, "Duplicate marker '{marker}' at position {position}")
            }
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a marker string.
///
/// Every character is checked independently for whitespace, control
/// characters and repeats, so a tab yields both a whitespace and a control
/// violation at the same position. An empty done string yields exactly one
/// violation and no per-character checks.
#[must_use]
pub fn validate_markers(markers: &str, kind: MarkerKind) -> Vec<MarkerViolation> {
    if markers.is_empty() {
        return if kind.requires_non_empty() {
            vec![MarkerViolation::Empty { kind }]
        } else {
            Vec::new()
        };
    }

    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for (index, marker) in markers.chars().enumerate() {
        let position = index + 1;

        if marker.is_whitespace() {
            violations.push(MarkerViolation::Whitespace { position });
        }

        if marker.is_control() {
            violations.push(MarkerViolation::Control { position });
        }

        if !seen.insert(marker) {
            violations.push(MarkerViolation::Duplicate { marker, position });
        }
    }

    violations
}

/// Validate a done marker string.
#[must_use]
pub fn validate_done_markers(markers: &str) -> Vec<MarkerViolation> {
    validate_markers(markers, MarkerKind::Done)
}

/// Validate an ignored marker string.
#[must_use]
pub fn validate_ignored_markers(markers: &str) -> Vec<MarkerViolation> {
    validate_markers(markers, MarkerKind::Ignored)
}

// ============================================================================
// Marker Set
// ============================================================================

/// An immutable, validated, ordered set of distinct status markers.
///
/// Only constructible through [`MarkerSet::new`] (or the defaults), so every
/// instance satisfies the validation rules for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    kind: MarkerKind,
    markers: Vec<char>,
}

impl MarkerSet {
    /// Validate `markers` and build the set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLaneError::InvalidMarkers`] with every violation when the
    /// string breaks any rule. No partial set is ever produced.
    pub fn new(markers: &str, kind: MarkerKind) -> Result<Self> {
        let violations = validate_markers(markers, kind);
        if !violations.is_empty() {
            tracing::debug!(
                "Rejected {} status markers {:?}: {} violation(s)",
                kind,
                markers,
                violations.len()
            );
            return Err(TaskLaneError::InvalidMarkers { kind, violations });
        }

        Ok(Self {
            kind,
            markers: markers.chars().collect(),
        })
    }

    /// Build a done marker set.
    ///
    /// # Errors
    ///
    /// See [`MarkerSet::new`].
    pub fn done(markers: &str) -> Result<Self> {
        Self::new(markers, MarkerKind::Done)
    }

    /// Build an ignored marker set.
    ///
    /// # Errors
    ///
    /// See [`MarkerSet::new`].
    pub fn ignored(markers: &str) -> Result<Self> {
        Self::new(markers, MarkerKind::Ignored)
    }

    /// The default done set, `xX`.
    #[must_use]
    pub fn default_done() -> Self {
        Self {
            kind: MarkerKind::Done,
            markers: DEFAULT_DONE_STATUS_MARKERS.chars().collect(),
        }
    }

    /// The default ignored set, which is empty.
    #[must_use]
    pub fn default_ignored() -> Self {
        Self {
            kind: MarkerKind::Ignored,
            markers: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    #[must_use]
    pub fn contains(&self, marker: char) -> bool {
        self.markers.contains(&marker)
    }

    /// The canonical member: the first marker in configuration order.
    #[must_use]
    pub fn first(&self) -> Option<char> {
        self.markers.first().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.markers.iter().copied()
    }
}

impl fmt::Display for MarkerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for marker in &self.markers {
            write!(f, "{marker}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
