//! Diagnostics produced by checks.

use std::fmt;

use serde::Serialize;

use crate::ast::Pos;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A warning: reported but usually non-fatal.
    Warning,
    /// An error.
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

/// One diagnostic emitted against a document position.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// The document the diagnostic applies to.
    pub filename: String,
    /// Position line.
    pub line: usize,
    /// Position column.
    pub column: usize,
    /// Name of the check that produced it.
    pub check: String,
    /// Severity.
    pub severity: Severity,
    /// Human-readable text.
    pub message: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Synthesized positions can carry a zero column; render them at 1.
        let column = self.column.max(1);
        write!(
            f,
            "{}:{}:{}: {}: {} ({})",
            self.filename, self.line, column, self.severity, self.message, self.check
        )
    }
}

/// An ordered collection of diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Messages(Vec<Message>);

impl Messages {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, message: Message) {
        self.0.push(message);
    }

    /// Appends every diagnostic from `other`.
    pub fn extend(&mut self, other: Messages) {
        self.0.extend(other.0);
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no diagnostics were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the diagnostics in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    /// Returns the highest severity recorded, if any.
    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.0.iter().map(|m| m.severity).max()
    }
}

impl<'a> IntoIterator for &'a Messages {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Messages {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Message {
    /// Builds a diagnostic for `filename` at `pos`.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        pos: Pos,
        check: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            line: pos.line,
            column: pos.column,
            check: check.into(),
            severity,
            message: message.into(),
        }
    }
}
