//! Turning detected changes into file operations

use std::path::{Path, PathBuf};

use crate::comparison::{ChangeKind, ChangeSet};

/// One file operation against the source-of-truth tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy a file that only exists in the working copy
    Create {
        /// Working-copy file
        from: PathBuf,
        /// Source-of-truth destination
        to: PathBuf,
    },
    /// Overwrite a source-of-truth file with its changed working copy
    Update {
        /// Working-copy file
        from: PathBuf,
        /// Source-of-truth destination
        to: PathBuf,
    },
    /// Remove a source-of-truth file deleted from the working copy
    Delete {
        /// Source-of-truth file
        path: PathBuf,
    },
}

impl SyncAction {
    /// Label recorded in the session log
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Create { .. } => "Auto-sync copy",
            Self::Update { .. } => "Auto-sync update",
            Self::Delete { .. } => "Auto-sync delete",
        }
    }
}

/// Maps a change set onto concrete actions
pub struct SyncActionResolver;

impl SyncActionResolver {
    /// Resolve every change into an action with absolute paths.
    /// Order follows [`ChangeSet::iter`].
    #[must_use]
    pub fn resolve(source_root: &Path, working_root: &Path, changes: &ChangeSet) -> Vec<SyncAction> {
        changes
            .iter()
            .map(|change| match change.kind {
                ChangeKind::New => SyncAction::Create {
                    from: working_root.join(change.path),
                    to: source_root.join(change.path),
                },
                ChangeKind::Modified => SyncAction::Update {
                    from: working_root.join(change.path),
                    to: source_root.join(change.path),
                },
                ChangeKind::Deleted => SyncAction::Delete {
                    path: source_root.join(change.path),
                },
            })
            .collect()
    }
}
