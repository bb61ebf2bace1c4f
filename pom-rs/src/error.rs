//! Error types for pom-editor.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pom-editor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing a POM file.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input was rejected before anything was touched.
    #[error("{0}")]
    Validation(String),

    /// The document is not well-formed.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The safety copy could not be taken, so the edit never started.
    #[error("cannot start edit of '{}': failure during backup process: {source}", path.display())]
    Backup {
        /// Target file whose backup failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Restoring the target from its backup failed.
    #[error("error during rollback of '{}': {source}", path.display())]
    Rollback {
        /// Target file being restored.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Deleting the backup of a target failed.
    #[error("error during commit of '{}': {source}", path.display())]
    Commit {
        /// Target file being committed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}
