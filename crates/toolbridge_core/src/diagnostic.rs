//! Graded diagnostics and the field paths they point at.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dot/bracket-addressed path into a tool definition.
///
/// Paths are rooted at canonical field names (`name`, `description`,
/// `parameters`) regardless of which dialect the document came from, e.g.
/// `parameters.properties.address` or `parameters.required[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// Create a path with a single segment
    #[must_use]
    pub fn root(segment: &str) -> Self {
        Self(segment.to_string())
    }

    /// Path of the canonical parameter tree
    #[must_use]
    pub fn parameters() -> Self {
        Self::root("parameters")
    }

    /// Append a named field
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    /// Append an array index
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    /// Path of a named property under an object node
    #[must_use]
    pub fn property(&self, name: &str) -> Self {
        self.field("properties").field(name)
    }

    /// Path of the `index`-th `required` entry of an object node
    #[must_use]
    pub fn required(&self, index: usize) -> Self {
        self.field("required").index(index)
    }

    /// Path of the item schema of an array node
    #[must_use]
    pub fn items(&self) -> Self {
        self.field("items")
    }

    /// Get the path as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path has no segments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Tolerated, but the result may lose information or quality
    Warning,
    /// The definition is not acceptable for the target dialect
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single finding produced by validation or encoding.
///
/// Diagnostics are produced fresh per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Offending field
    pub path: FieldPath,
    /// How serious the finding is
    pub severity: Severity,
    /// Human-readable explanation
    pub message: String,
}

impl Diagnostic {
    /// Create a warning
    #[must_use]
    pub fn warning(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an error
    #[must_use]
    pub fn error(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Check if this diagnostic is an error
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Raise a warning to an error
    #[must_use]
    pub fn escalate(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
