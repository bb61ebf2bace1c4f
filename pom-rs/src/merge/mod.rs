//! Semantic merge of declarations into a POM.
//!
//! The engine takes one [`Change`] at a time and applies it to the project
//! element of a parsed document:
//!
//! 1. Resolve the scope the change lives in (see [`crate::resolver`])
//! 2. Find declarations with the same identity
//! 3. Update every match attribute by attribute, or insert a new
//!    declaration at its sorted position
//!
//! Every structural edit is recorded in the [`EditLog`].

mod dependency;
mod edit_log;
mod property;

pub use dependency::{merge_dependency, scope_and_type_first, DependencyKey};
pub use edit_log::{EditEntry, EditLog, EditType};
pub use property::merge_property;

use std::fmt;

use tracing::debug;

use crate::model::{Change, ProfileRef, Scope};
use crate::resolver::resolve;
use crate::xml::{XmlElement, XmlFormat};

/// What applying a single change did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new declaration was added.
    Inserted,
    /// Existing declarations were modified.
    Updated {
        /// Number of declarations sharing the identity.
        matches: usize,
    },
    /// Everything already matched the request.
    Unchanged,
    /// A declaration was removed.
    Removed,
    /// The target scope does not exist and may not be created.
    ScopeAbsent,
}

impl MergeOutcome {
    /// Returns true if the document was modified.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            MergeOutcome::Inserted | MergeOutcome::Updated { .. } | MergeOutcome::Removed
        )
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::Inserted => write!(f, "inserted"),
            MergeOutcome::Updated { matches: 1 } => write!(f, "updated"),
            MergeOutcome::Updated { matches } => write!(f, "updated {} declarations", matches),
            MergeOutcome::Unchanged => write!(f, "unchanged"),
            MergeOutcome::Removed => write!(f, "removed"),
            MergeOutcome::ScopeAbsent => write!(f, "skipped, scope absent"),
        }
    }
}

/// Applies changes to a project element.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    /// Layout for inserted elements.
    format: XmlFormat,
    /// Log of edit operations performed.
    pub edit_log: EditLog,
}

impl MergeEngine {
    /// Creates an engine that lays out new elements with `format`.
    pub fn new(format: XmlFormat) -> Self {
        MergeEngine {
            format,
            edit_log: EditLog::new(),
        }
    }

    /// Returns the layout used for inserted elements.
    pub fn format(&self) -> &XmlFormat {
        &self.format
    }

    /// Applies `change` to `project`.
    pub fn apply(&mut self, project: &mut XmlElement, change: &Change) -> MergeOutcome {
        let outcome = match change {
            Change::Dependency { scope, coordinate } => {
                merge_dependency(project, scope, coordinate, &self.format, &mut self.edit_log)
            }
            Change::Property(property) => {
                merge_property(project, property, &self.format, &mut self.edit_log)
            }
            Change::Profile(profile) => self.ensure_profile(project, profile),
        };
        debug!(%change, %outcome, "change applied");
        outcome
    }

    fn ensure_profile(&mut self, project: &mut XmlElement, profile: &ProfileRef) -> MergeOutcome {
        let mark = self.edit_log.edit_count();
        let scope = Scope::Profile(profile.clone());
        let found = resolve(project, &scope, &self.format, &mut self.edit_log).is_some();
        match (found, self.edit_log.edits_since(mark).is_empty()) {
            (false, _) => MergeOutcome::ScopeAbsent,
            (true, true) => MergeOutcome::Unchanged,
            (true, false) => MergeOutcome::Inserted,
        }
    }
}
