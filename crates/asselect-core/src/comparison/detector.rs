//! Recursive change detection between two directory trees
//!
//! Both trees are rescanned on every call; nothing is cached between passes.

use std::path::{Path, PathBuf};

use super::{Change, ChangeKind};
use crate::scanner::{Scanner, TreeSnapshot};

/// Result of one detection pass. Paths are relative and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Present in both trees with different content
    pub modified: Vec<PathBuf>,
    /// Present only in the working copy
    pub new: Vec<PathBuf>,
    /// Present only in the source of truth
    pub deleted: Vec<PathBuf>,
}

impl ChangeSet {
    /// Whether the trees are in sync
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.new.is_empty() && self.deleted.is_empty()
    }

    /// Total number of changed paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.modified.len() + self.new.len() + self.deleted.len()
    }

    /// Iterate over every change: modified, then new, then deleted
    pub fn iter(&self) -> impl Iterator<Item = Change<'_>> {
        fn tagged(kind: ChangeKind, paths: &[PathBuf]) -> impl Iterator<Item = Change<'_>> {
            paths.iter().map(move |path| Change {
                kind,
                path: path.as_path(),
            })
        }

        tagged(ChangeKind::Modified, &self.modified)
            .chain(tagged(ChangeKind::New, &self.new))
            .chain(tagged(ChangeKind::Deleted, &self.deleted))
    }
}

/// Change detector
pub struct ChangeDetector;

impl ChangeDetector {
    /// Scan both roots and classify every relative path.
    ///
    /// Missing roots scan as empty trees, so a missing working copy reports
    /// every source file as deleted and a missing source reports every working
    /// file as new.
    #[must_use]
    pub fn detect(source_root: &Path, working_root: &Path) -> ChangeSet {
        let source = Scanner::scan(source_root);
        let working = Scanner::scan(working_root);

        let changes = Self::compare(&source, &working);

        tracing::debug!(
            source = %source_root.display(),
            working = %working_root.display(),
            modified = changes.modified.len(),
            new = changes.new.len(),
            deleted = changes.deleted.len(),
            "detected changes"
        );

        changes
    }

    /// Classify two already-taken snapshots
    #[must_use]
    pub fn compare(source: &TreeSnapshot, working: &TreeSnapshot) -> ChangeSet {
        let mut changes = ChangeSet::default();

        for (rel_path, working_record) in &working.files {
            match source.get(rel_path) {
                Some(source_record) if source_record.is_content_equal(working_record) => {}
                Some(_) => changes.modified.push(rel_path.clone()),
                None => changes.new.push(rel_path.clone()),
            }
        }

        for rel_path in source.files.keys() {
            if !working.contains(rel_path) {
                changes.deleted.push(rel_path.clone());
            }
        }

        changes
    }

    /// Whether the trees differ at all. Used for cheap periodic polling.
    #[must_use]
    pub fn has_changes(source_root: &Path, working_root: &Path) -> bool {
        !Self::detect(source_root, working_root).is_empty()
    }
}
