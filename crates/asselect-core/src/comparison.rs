//! Change detection between a source-of-truth tree and its working copy
//!
//! The working copy is authoritative: every difference is classified from the
//! point of view of what the source of truth must do to catch up.
//! - Content differences are judged by size plus modification time (with a
//!   tolerance), never by hashing
//! - Each relative path lands in at most one of modified, new, or deleted

mod detector;
mod timestamp;

#[cfg(test)]
mod integration_tests;

use std::path::Path;

pub use detector::{ChangeDetector, ChangeSet};
pub use timestamp::{MTIME_TOLERANCE, TimestampComparator};

/// How a single relative path differs between the two trees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present in both trees with different content
    Modified,
    /// Present only in the working copy
    New,
    /// Present only in the source of truth
    Deleted,
}

impl ChangeKind {
    /// Short label used in logs and CLI output
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::New => "new",
            Self::Deleted => "deleted",
        }
    }
}

/// One classified path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change<'a> {
    /// Classification
    pub kind: ChangeKind,
    /// Path relative to both roots
    pub path: &'a Path,
}
