//! Edit operation logging for the merge engine.
//!
//! This module tracks the structural edits made while merging declarations
//! into a document: inserted elements, updated text and removed elements.

use std::fmt;

/// Types of edit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    /// Element was inserted.
    Insert,
    /// Element text was replaced.
    Update,
    /// Element was removed.
    Delete,
}

impl EditType {
    /// Returns the tag name for this edit type.
    pub fn tag_name(&self) -> &'static str {
        match self {
            EditType::Insert => "insert",
            EditType::Update => "update",
            EditType::Delete => "delete",
        }
    }
}

/// A single edit operation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEntry {
    /// The type of edit operation.
    pub edit_type: EditType,
    /// Element path, e.g. `/project/dependencies/dependency[0]/version`.
    pub path: String,
}

impl fmt::Display for EditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.edit_type.tag_name(), self.path)
    }
}

/// Log of edit operations performed during a merge.
#[derive(Debug, Default, Clone)]
pub struct EditLog {
    edits: Vec<EditEntry>,
}

impl EditLog {
    /// Creates a new empty edit log.
    pub fn new() -> Self {
        EditLog { edits: Vec::new() }
    }

    /// Records an insert operation.
    pub fn insert(&mut self, path: impl Into<String>) {
        self.record(EditType::Insert, path.into());
    }

    /// Records an update operation.
    pub fn update(&mut self, path: impl Into<String>) {
        self.record(EditType::Update, path.into());
    }

    /// Records a delete operation.
    pub fn delete(&mut self, path: impl Into<String>) {
        self.record(EditType::Delete, path.into());
    }

    fn record(&mut self, edit_type: EditType, path: String) {
        tracing::debug!(edit = edit_type.tag_name(), %path, "document edited");
        self.edits.push(EditEntry { edit_type, path });
    }

    /// Returns the number of edit operations.
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Returns true if nothing was edited.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Returns a reference to the edit operations.
    pub fn edits(&self) -> &[EditEntry] {
        &self.edits
    }

    /// Returns the edits recorded after the first `from`.
    pub fn edits_since(&self, from: usize) -> &[EditEntry] {
        &self.edits[from.min(self.edits.len())..]
    }

    /// Counts operations by type.
    pub fn count_by_type(&self, edit_type: EditType) -> usize {
        self.edits
            .iter()
            .filter(|e| e.edit_type == edit_type)
            .count()
    }
}
