//! Edit configuration.

/// What happens to the backup after a successful edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CommitMode {
    /// Keep the backup until [`commit`](crate::transaction::commit) or
    /// [`rollback`](crate::transaction::rollback) is called.
    #[default]
    Deferred,
    /// Delete the backup as soon as the edit succeeds.
    Immediate,
}

impl CommitMode {
    /// Maps an "auto commit" flag onto a mode.
    pub fn from_auto_commit(auto_commit: bool) -> Self {
        if auto_commit {
            CommitMode::Immediate
        } else {
            CommitMode::Deferred
        }
    }
}

/// Options applied to every edit of a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOptions {
    pub commit_mode: CommitMode,
}

impl EditOptions {
    pub fn new(commit_mode: CommitMode) -> Self {
        EditOptions { commit_mode }
    }

    /// Options that commit right after each successful edit.
    pub fn auto_commit() -> Self {
        EditOptions::new(CommitMode::Immediate)
    }
}
