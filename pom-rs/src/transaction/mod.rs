//! Transactional editing of a target file.
//!
//! An edit runs as a unit of work wrapped by [`ChangeTransaction::execute`]:
//!
//! 1. Take a backup of the target, unless an earlier edit already did
//! 2. Run the unit of work
//! 3. On failure or panic, restore the target if this edit owns the backup
//!
//! A backup taken by an earlier edit is never restored or deleted by a
//! later one. It stays until [`commit`] or [`rollback`] is called, so a
//! series of edits can be undone as a whole.

mod backup;

pub use backup::{
    backup_file_of, commit, rollback, BackupStrategy, FsBackup, FsRollback, RollbackStrategy,
};

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::config::{CommitMode, EditOptions};
use crate::error::Result;

/// Wraps edits of one target file with backup and rollback.
#[derive(Debug, Clone)]
pub struct ChangeTransaction<B = FsBackup, R = FsRollback> {
    target: PathBuf,
    options: EditOptions,
    backup: B,
    rollback: R,
}

impl ChangeTransaction {
    /// Creates a transaction using backups on the filesystem.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        ChangeTransaction::with_strategies(target, FsBackup, FsRollback)
    }
}

impl<B: BackupStrategy, R: RollbackStrategy> ChangeTransaction<B, R> {
    /// Creates a transaction with custom backup and rollback strategies.
    pub fn with_strategies(target: impl Into<PathBuf>, backup: B, rollback: R) -> Self {
        ChangeTransaction {
            target: target.into(),
            options: EditOptions::default(),
            backup,
            rollback,
        }
    }

    pub fn with_options(mut self, options: EditOptions) -> Self {
        self.options = options;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn options(&self) -> EditOptions {
        self.options
    }

    /// Runs `unit_of_work` against the target.
    ///
    /// A backup failure aborts before the unit of work runs. A failing unit
    /// of work returns its own error unchanged; if this call created the
    /// backup, the target is restored first. A failed restore is logged and
    /// does not replace that error. A panic is treated the same way and then
    /// resumed.
    pub fn execute<T, F>(&self, unit_of_work: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let owns_backup = self.backup.backup(&self.target)?;

        match panic::catch_unwind(AssertUnwindSafe(unit_of_work)) {
            Ok(Ok(value)) => {
                if owns_backup && self.options.commit_mode == CommitMode::Immediate {
                    commit(&self.target)?;
                }
                Ok(value)
            }
            Ok(Err(err)) => {
                self.abort(owns_backup, &err);
                Err(err)
            }
            Err(payload) => {
                self.abort(owns_backup, &"unit of work panicked");
                panic::resume_unwind(payload)
            }
        }
    }

    fn abort(&self, owns_backup: bool, cause: &dyn fmt::Display) {
        if !owns_backup {
            debug!(
                file = %self.target.display(),
                %cause,
                "edit failed, backup belongs to an earlier edit and is kept"
            );
            return;
        }
        debug!(file = %self.target.display(), %cause, "edit failed, rolling back");
        if let Err(rollback_err) = self.rollback.rollback(&self.target) {
            error!(
                "error during rollback of '{}': {}",
                self.target.display(),
                rollback_err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::Cell;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn target_in(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("pom.xml");
        fs::write(&path, "<project/>").unwrap();
        path
    }

    struct FailingRollback;

    impl RollbackStrategy for FailingRollback {
        fn rollback(&self, target: &Path) -> Result<bool> {
            Err(Error::Rollback {
                path: target.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "disk gone"),
            })
        }
    }

    struct CountingRollback<'a>(&'a Cell<usize>);

    impl RollbackStrategy for CountingRollback<'_> {
        fn rollback(&self, target: &Path) -> Result<bool> {
            self.0.set(self.0.get() + 1);
            rollback(target)
        }
    }

    #[test]
    fn test_success_keeps_backup_by_default() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        let transaction = ChangeTransaction::new(&target);

        let value = transaction
            .execute(|| {
                fs::write(&target, "<project></project>")?;
                Ok(7)
            })
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(
            fs::read_to_string(backup_file_of(&target)).unwrap(),
            "<project/>"
        );
    }

    #[test]
    fn test_immediate_mode_commits() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        let transaction = ChangeTransaction::new(&target).with_options(EditOptions::auto_commit());

        transaction.execute(|| Ok(())).unwrap();
        assert!(!backup_file_of(&target).exists());
    }

    #[test]
    fn test_failure_restores_owned_backup() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        let transaction = ChangeTransaction::new(&target);

        let err = transaction
            .execute(|| -> Result<()> {
                fs::write(&target, "garbage")?;
                Err(Error::validation("boom"))
            })
            .unwrap_err();

        assert_eq!(err.to_string(), "boom");
        assert_eq!(fs::read_to_string(&target).unwrap(), "<project/>");
        assert!(!backup_file_of(&target).exists());
    }

    #[test]
    fn test_failure_leaves_foreign_backup_alone() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        let calls = Cell::new(0);
        let transaction = ChangeTransaction::with_strategies(&target, FsBackup, CountingRollback(&calls));

        transaction.execute(|| Ok(())).unwrap();
        fs::write(&target, "<project>first</project>").unwrap();

        let result = transaction.execute(|| -> Result<()> { Err(Error::validation("boom")) });

        assert!(result.is_err());
        assert_eq!(calls.get(), 0);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "<project>first</project>"
        );
        assert_eq!(
            fs::read_to_string(backup_file_of(&target)).unwrap(),
            "<project/>"
        );
    }

    #[test]
    fn test_rollback_failure_does_not_mask_error() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        let transaction = ChangeTransaction::with_strategies(&target, FsBackup, FailingRollback);

        let err = transaction
            .execute(|| -> Result<()> { Err(Error::validation("original")) })
            .unwrap_err();

        assert!(matches!(err, Error::Validation(ref m) if m == "original"));
    }

    #[test]
    fn test_backup_failure_skips_unit_of_work() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing.xml");
        let transaction = ChangeTransaction::new(&target);
        let ran = Cell::new(false);

        let err = transaction
            .execute(|| {
                ran.set(true);
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, Error::Backup { .. }));
        assert!(!ran.get());
    }

    #[test]
    fn test_panic_restores_owned_backup() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        let transaction = ChangeTransaction::new(&target);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            transaction.execute(|| -> Result<()> {
                fs::write(&target, "<project>half").unwrap();
                panic!("writer crashed");
            })
        }));

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "<project/>");
        assert!(!backup_file_of(&target).exists());
    }
}
