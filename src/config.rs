//! Board configuration.
//!
//! Settings are stored as JSON, by default in `.tasklane/settings.json` under
//! the project directory:
//!
//! ```json
//! {
//!   "columns": ["Later", "Soonish", "Next week", "This week", "Today", "Pending"],
//!   "consolidateTags": false,
//!   "doneStatusMarkers": "xX",
//!   "ignoredStatusMarkers": "",
//!   "scope": "folder",
//!   "showFilepath": true,
//!   "preventUncategorized": false,
//!   "collapsedColumns": []
//! }
//! ```
//!
//! Every field is optional. Marker strings are validated before use and
//! invalid input is rejected with every violation listed; it never falls
//! back to the defaults silently.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::columns::ColumnTagTable;
use crate::error::{Result, TaskLaneError};
use crate::markers::{
    validate_markers, MarkerKind, MarkerSet, DEFAULT_DONE_STATUS_MARKERS,
    DEFAULT_IGNORED_STATUS_MARKERS,
};
use crate::task::TaskContext;

/// Columns a fresh board starts with.
pub const DEFAULT_COLUMNS: [&str; 6] = [
    "Later",
    "Soonish",
    "Next week",
    "This week",
    "Today",
    "Pending",
];

/// Board settings loaded from `settings.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    /// Column display names, in board order
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,

    /// Display hint for renderers: gather tags into the card footer.
    #[serde(default)]
    pub consolidate_tags: bool,

    #[serde(default = "default_done_markers")]
    pub done_status_markers: String,

    #[serde(default = "default_ignored_markers")]
    pub ignored_status_markers: String,

    // Display settings below are stored for renderers and never interpreted
    // by the codec.
    /// Where a board looks for task files.
    #[serde(default)]
    pub scope: BoardScope,

    /// Show each task's source file on its card.
    #[serde(default = "default_true")]
    pub show_filepath: bool,

    /// Hide the column for tasks without a column tag.
    #[serde(default)]
    pub prevent_uncategorized: bool,

    /// Column tag keys whose columns are collapsed.
    #[serde(default)]
    pub collapsed_columns: Vec<String>,
}

/// Which files a board collects tasks from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardScope {
    /// The folder holding the board file
    #[default]
    Folder,
    /// The whole vault
    Everywhere,
}

impl fmt::Display for BoardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::Everywhere => write!(f, "everywhere"),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(ToString::to_string).collect()
}

fn default_done_markers() -> String {
    DEFAULT_DONE_STATUS_MARKERS.to_string()
}

fn default_ignored_markers() -> String {
    DEFAULT_IGNORED_STATUS_MARKERS.to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            consolidate_tags: false,
            done_status_markers: default_done_markers(),
            ignored_status_markers: default_ignored_markers(),
            scope: BoardScope::default(),
            show_filepath: true,
            prevent_uncategorized: false,
            collapsed_columns: Vec::new(),
        }
    }
}

impl BoardConfig {
    /// Load configuration from a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content).map_err(|e| {
            TaskLaneError::config_with_path(
                format!("failed to parse {}: {}", path.display(), e),
                path.to_path_buf(),
            )
        })?;
        debug!("Loaded board config from {}", path.display());
        Ok(config)
    }

    /// Resolve and load the configuration for a project.
    ///
    /// Lookup order: `explicit`, the project settings file, the user settings
    /// file, then built-in defaults. An explicit path that does not exist is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be loaded.
    pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(TaskLaneError::config_with_path(
                    format!("config file not found: {}", path.display()),
                    path.to_path_buf(),
                ));
            }
            return Self::load(path);
        }

        for candidate in Self::search_paths(project_dir) {
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }

        debug!("No settings file found, using defaults");
        Ok(Self::default())
    }

    /// Candidate settings files, most specific first.
    #[must_use]
    pub fn search_paths(project_dir: &Path) -> Vec<PathBuf> {
        let mut paths = vec![Self::settings_path(project_dir)];
        if let Some(user) = Self::user_settings_path() {
            paths.push(user);
        }
        paths
    }

    /// Get the project settings.json path
    pub fn settings_path(project_dir: &Path) -> PathBuf {
        project_dir.join(".tasklane/settings.json")
    }

    /// Get the per-user settings.json path, if the platform has a config dir
    pub fn user_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tasklane/settings.json"))
    }

    /// Collect every problem in the configuration without stopping early.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (kind, markers) in [
            (MarkerKind::Done, &self.done_status_markers),
            (MarkerKind::Ignored, &self.ignored_status_markers),
        ] {
            for violation in validate_markers(markers, kind) {
                report.errors.push(format!("{kind} status markers: {violation}"));
            }
        }

        let mut table = ColumnTagTable::new();
        for column in &self.columns {
            if let Err(e) = table.insert(column) {
                report.errors.push(e.to_string());
            }
        }

        for key in &self.collapsed_columns {
            if table.resolve_tag(key).is_none() {
                report
                    .warnings
                    .push(format!("Collapsed column '{key}' is not a configured column"));
            }
        }

        if self.columns.is_empty() {
            report
                .warnings
                .push("No columns configured; every task will be uncategorised".to_string());
        }

        if let Ok(done) = MarkerSet::done(&self.done_status_markers) {
            let overlap: String = done
                .iter()
                .filter(|c| self.ignored_status_markers.contains(*c))
                .collect();
            if !overlap.is_empty() {
                report.warnings.push(format!(
                    "Markers '{overlap}' are both done and ignored; those tasks will be ignored"
                ));
            }
        }

        report
    }

    /// Build the parse context for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLaneError::InvalidMarkers`] for bad marker strings and
    /// [`TaskLaneError::InvalidConfig`] for bad column names.
    pub fn context(&self) -> Result<TaskContext> {
        let done = MarkerSet::done(&self.done_status_markers)?;
        let ignored = MarkerSet::ignored(&self.ignored_status_markers)?;
        let table = ColumnTagTable::from_columns(&self.columns)?;

        Ok(TaskContext::new(table)
            .with_done_markers(done)
            .with_ignored_markers(ignored)
            .with_consolidate_tags(self.consolidate_tags))
    }
}

// ============================================================================
// Validation Report
// ============================================================================

/// Result of configuration validation.
///
/// Errors make the configuration unusable; warnings do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the configuration is valid (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns 0 if valid, 1 if invalid.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.is_valid() {
            0
        } else {
            1
        }
    }

    /// Generate a human-readable summary of the validation result.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_valid() {
            if self.warnings.is_empty() {
                "Configuration is valid.".to_string()
            } else {
                format!(
                    "Configuration is valid with {} warning(s).",
                    self.warnings.len()
                )
            }
        } else {
            format!(
                "Configuration is invalid with {} error(s).",
                self.errors.len()
            )
        }
    }
}
