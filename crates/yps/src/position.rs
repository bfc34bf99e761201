//! Source positions attached to parsed YAML values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where a parsed value starts in the original YAML text.
///
/// Lines and columns are 1-based; columns count characters, not bytes.
/// A `Position` is created once per node while parsing and never changes
/// afterwards, so it exposes read-only accessors only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    filename: Option<Arc<str>>,
    line: usize,
    column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(filename: Option<Arc<str>>, line: usize, column: usize) -> Self {
        Self {
            filename,
            line,
            column,
        }
    }

    /// Create a position from a yaml-rust2 marker.
    ///
    /// yaml-rust2 reports lines starting at 1 and columns starting at 0.
    pub fn from_marker(marker: &yaml_rust2::scanner::Marker, filename: Option<&Arc<str>>) -> Self {
        Self {
            filename: filename.cloned(),
            line: marker.line(),
            column: marker.col() + 1,
        }
    }

    /// Set the filename for this position.
    pub fn with_filename(mut self, filename: impl Into<Arc<str>>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Name of the file the value was read from, if known.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            filename: None,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "filename: {} line {} column {}",
            self.filename().unwrap_or("unknown"),
            self.line,
            self.column
        )
    }
}
