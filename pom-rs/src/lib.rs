//! pom-editor - Transactional editing of Maven POM files
//!
//! This library edits dependency declarations, managed dependencies,
//! properties and profiles of a POM in place. Untouched parts of the file,
//! including comments and whitespace, are kept byte-for-byte.
//!
//! # Overview
//!
//! An edit merges one or more [`Change`]s into the document:
//!
//! - A dependency matching an existing `groupId` + `artifactId` is updated
//!   attribute by attribute; otherwise it is inserted in scope-and-type order
//! - A property is set, created or removed
//! - Declarations can target the project, a profile, or either one's
//!   `<dependencyManagement>`
//!
//! Applying the same change twice leaves the file as it was after the first
//! time.
//!
//! # Transactions
//!
//! Every edit runs inside a [`ChangeTransaction`]. The first edit of a file
//! copies it to `<file>.backup`; a failed edit restores the file from that
//! copy. Later edits stack on top of the same backup until it is committed
//! (deleted) or rolled back (restored).
//!
//! ```no_run
//! use pom_editor::{Change, Coordinate, PomEditor, Property};
//!
//! let editor = PomEditor::new("pom.xml");
//! editor.update_or_add(&[
//!     Change::dependency(Coordinate::parse_gav("org.slf4j:slf4j-api:2.0.13")?),
//!     Change::property(Property::set("java.version", "17")?),
//! ])?;
//! editor.commit()?;
//! # Ok::<(), pom_editor::Error>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod merge;
pub mod model;
pub mod pom;
pub mod resolver;
pub mod transaction;
pub mod xml;

// Re-export commonly used types
pub use config::{CommitMode, EditOptions};
pub use error::{Error, Result};
pub use model::{Change, Coordinate, ProfileMode, ProfileRef, Property, Scope};
pub use pom::{Pom, PomEditor};
pub use xml::{parse_file, parse_str, XmlDocument, XmlElement, XmlFormat, XmlNode, XmlPrinter};

// Re-export merge types
pub use merge::{EditLog, EditType, MergeEngine, MergeOutcome};

// Re-export transaction types
pub use transaction::{
    backup_file_of, commit, rollback, BackupStrategy, ChangeTransaction, FsBackup, FsRollback,
    RollbackStrategy,
};
