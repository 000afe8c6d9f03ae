//! Custom error types for tasklane.
//!
//! This module provides the structured error type shared by the marker
//! validator, the task codec, the document layer and the configuration
//! loader.

use std::path::PathBuf;
use thiserror::Error;

use crate::markers::{MarkerKind, MarkerViolation};

/// Main error type for tasklane operations
#[derive(Error, Debug)]
pub enum TaskLaneError {
    // =========================================================================
    // Marker Errors
    // =========================================================================
    /// A status marker string failed validation.
    ///
    /// Carries every violation found, in discovery order.
    #[error("Invalid {kind} status markers: {}", join_violations(.violations))]
    InvalidMarkers {
        kind: MarkerKind,
        violations: Vec<MarkerViolation>,
    },

    // =========================================================================
    // Task Errors
    // =========================================================================
    /// The line does not have the `- [c] ` checkbox shape
    #[error("Not a task line: {line:?}")]
    NotATask { line: String },

    /// A task refers to a row that no longer exists in its document
    #[error("Row {row} is out of range (document has {len} lines)")]
    RowOutOfRange { row: usize, len: usize },

    /// No tracked task exists at the requested row
    #[error("No tracked task on line {} of {}", .row + 1, .path.display())]
    NoTaskAtRow { row: usize, path: PathBuf },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_violations(violations: &[MarkerViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl TaskLaneError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Violations carried by an [`TaskLaneError::InvalidMarkers`] error.
    ///
    /// Returns an empty slice for every other variant.
    #[must_use]
    pub fn violations(&self) -> &[MarkerViolation] {
        match self {
            Self::InvalidMarkers { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Check if this error comes from user configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMarkers { .. } | Self::Config { .. } | Self::InvalidConfig { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotATask { .. } | Self::RowOutOfRange { .. } | Self::NoTaskAtRow { .. } => 2,
            Self::InvalidMarkers { .. } | Self::Config { .. } | Self::InvalidConfig { .. } => 7,
            _ => 1,
        }
    }
}

/// Type alias for tasklane results
pub type Result<T> = std::result::Result<T, TaskLaneError>;
