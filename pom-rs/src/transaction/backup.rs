//! Backup files.
//!
//! The backup of a target lives next to it, named by appending
//! [`BACKUP_SUFFIX`] to the full target path. At most one exists per target.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::constants::BACKUP_SUFFIX;
use crate::error::{Error, Result};

/// Returns the backup path of `target`: `pom.xml` → `pom.xml.backup`.
pub fn backup_file_of(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Takes the safety copy of a target before it is edited.
pub trait BackupStrategy {
    /// Creates the backup unless one already exists.
    ///
    /// Returns true when this call created it, which makes the caller its
    /// owner.
    fn backup(&self, target: &Path) -> Result<bool>;
}

/// Restores a target from its safety copy.
pub trait RollbackStrategy {
    /// Restores `target` and deletes the backup. Returns false when there
    /// was no backup.
    fn rollback(&self, target: &Path) -> Result<bool>;
}

/// Filesystem backup next to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackup;

impl BackupStrategy for FsBackup {
    fn backup(&self, target: &Path) -> Result<bool> {
        let backup = backup_file_of(target);
        let failed = |source: io::Error| Error::Backup {
            path: target.to_path_buf(),
            source,
        };

        let mut original = File::open(target).map_err(failed)?;
        let mut copy = match OpenOptions::new().write(true).create_new(true).open(&backup) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(backup = %backup.display(), "backup already exists, keeping it");
                return Ok(false);
            }
            Err(e) => return Err(failed(e)),
        };

        let copied = io::copy(&mut original, &mut copy).and_then(|_| copy.sync_all());
        drop(copy);
        if let Err(e) = copied {
            let _ = fs::remove_file(&backup);
            return Err(failed(e));
        }

        info!(
            "backup for '{}' created: '{}'",
            target.display(),
            backup.display()
        );
        Ok(true)
    }
}

/// Filesystem rollback from the backup next to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRollback;

impl RollbackStrategy for FsRollback {
    fn rollback(&self, target: &Path) -> Result<bool> {
        rollback(target)
    }
}

/// Restores `target` from its backup and deletes the backup.
///
/// Returns false, touching nothing, when no backup exists.
pub fn rollback(target: &Path) -> Result<bool> {
    let backup = backup_file_of(target);
    if !backup.exists() {
        debug!(file = %target.display(), "no backup, nothing to roll back");
        return Ok(false);
    }
    let failed = |source: io::Error| Error::Rollback {
        path: target.to_path_buf(),
        source,
    };
    fs::copy(&backup, target).map_err(failed)?;
    fs::remove_file(&backup).map_err(failed)?;
    info!("'{}' restored from backup", target.display());
    Ok(true)
}

/// Deletes the backup of `target`, accepting its current content.
///
/// Returns false when there was no backup.
pub fn commit(target: &Path) -> Result<bool> {
    let backup = backup_file_of(target);
    match fs::remove_file(&backup) {
        Ok(()) => {
            info!("changes to '{}' committed", target.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(file = %target.display(), "no backup, nothing to commit");
            Ok(false)
        }
        Err(source) => Err(Error::Commit {
            path: target.to_path_buf(),
            source,
        }),
    }
}
