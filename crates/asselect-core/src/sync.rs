//! One-way synchronization from the working copy into the source of truth
//!
//! The source-of-truth tree is the only tree this module ever writes to. The
//! working copy is read-only here.

mod actions;
mod engine;
mod executor;
mod reporting;

use std::path::PathBuf;

pub use actions::{SyncAction, SyncActionResolver};
pub use engine::SyncEngine;
pub use executor::{FileOperationExecutor, TreeCopy};
pub use reporting::SyncReporter;

/// Synchronization result with statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Files copied that were new in the working copy
    pub created: usize,
    /// Files overwritten with their modified working copy
    pub updated: usize,
    /// Files removed from the source of truth
    pub deleted: usize,
    /// Changes that were already settled by the time they ran
    pub skipped: usize,
    /// Errors encountered
    pub errors: Vec<String>,
    /// Backup taken before applying changes
    pub backup: Option<PathBuf>,
}

impl SyncResult {
    /// Paths actually acted upon. Skips do not count.
    #[must_use]
    pub const fn files_synced(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Whether sync was successful (no errors)
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
