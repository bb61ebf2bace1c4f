//! POM documents and the transactional editor.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::EditOptions;
use crate::constants::PROJECT;
use crate::error::Result;
use crate::merge::{EditLog, MergeEngine, MergeOutcome};
use crate::model::Change;
use crate::transaction::{
    self, BackupStrategy, ChangeTransaction, FsBackup, FsRollback, RollbackStrategy,
};
use crate::xml::XmlDocument;

/// A POM file loaded for editing.
///
/// Keeps the text it was read from, so saving an unchanged document leaves
/// the file alone.
#[derive(Debug, Clone)]
pub struct Pom {
    path: PathBuf,
    source: String,
    document: XmlDocument,
    engine: MergeEngine,
}

impl Pom {
    /// Reads and parses the POM at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let source = fs::read_to_string(&path)?;
        Pom::from_source(path, source)
    }

    /// Parses `source` as the content of the POM at `path`.
    pub fn from_source(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let source = source.into();
        let document = XmlDocument::parse(&source)?;
        if document.root().name() != PROJECT {
            warn!(
                "root element of '{}' is <{}>, not <{}>",
                path.display(),
                document.root().name(),
                PROJECT
            );
        }
        let engine = MergeEngine::new(document.format().clone());
        Ok(Pom {
            path,
            source,
            document,
            engine,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// Edits performed since the POM was opened.
    pub fn edit_log(&self) -> &EditLog {
        &self.engine.edit_log
    }

    /// Merges `change` into the document.
    pub fn apply(&mut self, change: &Change) -> MergeOutcome {
        self.engine.apply(self.document.root_mut(), change)
    }

    /// Returns true if the document differs from the text it was read from.
    pub fn is_modified(&self) -> bool {
        self.document.to_string() != self.source
    }

    /// Writes the document back to its path.
    ///
    /// Returns false, without touching the file, when nothing changed.
    pub fn save(&mut self) -> Result<bool> {
        let output = self.document.to_string();
        if output == self.source {
            return Ok(false);
        }
        fs::write(&self.path, &output)?;
        self.source = output;
        Ok(true)
    }
}

/// Applies changes to a POM file inside a [`ChangeTransaction`].
#[derive(Debug, Clone)]
pub struct PomEditor<B = FsBackup, R = FsRollback> {
    transaction: ChangeTransaction<B, R>,
}

impl PomEditor {
    /// Creates an editor for the POM at `target`.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        PomEditor {
            transaction: ChangeTransaction::new(target),
        }
    }
}

impl<B: BackupStrategy, R: RollbackStrategy> PomEditor<B, R> {
    /// Creates an editor running inside `transaction`.
    pub fn from_transaction(transaction: ChangeTransaction<B, R>) -> Self {
        PomEditor { transaction }
    }

    pub fn with_options(self, options: EditOptions) -> Self {
        PomEditor {
            transaction: self.transaction.with_options(options),
        }
    }

    pub fn target(&self) -> &Path {
        self.transaction.target()
    }

    /// Merges `changes` into the target as one edit.
    ///
    /// Either every change is written or, on failure, the target is left as
    /// it was before this call.
    pub fn update_or_add(&self, changes: &[Change]) -> Result<Vec<MergeOutcome>> {
        self.transaction.execute(|| self.apply_changes(changes))
    }

    fn apply_changes(&self, changes: &[Change]) -> Result<Vec<MergeOutcome>> {
        let mut pom = Pom::open(self.target())?;
        let outcomes: Vec<MergeOutcome> = changes
            .iter()
            .map(|change| {
                let outcome = pom.apply(change);
                info!("{}: {}", change, outcome);
                outcome
            })
            .collect();
        if pom.save()? {
            info!(
                "'{}' written, {} edits",
                self.target().display(),
                pom.edit_log().edit_count()
            );
        }
        Ok(outcomes)
    }

    /// Accepts all edits made since the backup was taken.
    pub fn commit(&self) -> Result<bool> {
        transaction::commit(self.target())
    }

    /// Reverts the target to its backup.
    pub fn rollback(&self) -> Result<bool> {
        transaction::rollback(self.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Property;
    use tempfile::TempDir;

    const POM: &str = "<?xml version=\"1.0\"?>\n<project>\n  <properties>\n    <a>1</a>\n  </properties>\n</project>\n";

    #[test]
    fn test_save_without_changes_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pom.xml");
        fs::write(&path, POM).unwrap();

        let mut pom = Pom::open(&path).unwrap();
        let outcome = pom.apply(&Change::property(Property::set("a", "1").unwrap()));
        assert_eq!(outcome, MergeOutcome::Unchanged);
        assert!(!pom.is_modified());
        assert!(!pom.save().unwrap());
    }

    #[test]
    fn test_save_writes_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pom.xml");
        fs::write(&path, POM).unwrap();

        let mut pom = Pom::open(&path).unwrap();
        pom.apply(&Change::property(Property::set("a", "2").unwrap()));
        assert!(pom.is_modified());
        assert!(pom.save().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), POM.replace(">1<", ">2<"));
        assert!(!pom.is_modified());
    }

    #[test]
    fn test_open_rejects_malformed_xml() {
        assert!(Pom::from_source("pom.xml", "<project>").is_err());
    }
}
