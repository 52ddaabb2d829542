//! Directory tree scanning
//!
//! A scan walks every nested regular file below a root and records its size
//! and modification time, keyed by the path relative to that root.
//! Directories are structural and never appear as entries. Symbolic links are
//! neither followed nor recorded.
//!
//! Absence of the root is a normal state (e.g. before first use) and produces
//! an empty snapshot. Entries that cannot be read are skipped individually and
//! reported as warnings, so one unreadable file never hides the rest of the
//! tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::comparison::TimestampComparator;

/// Lightweight metadata for one file in a scanned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the scanned root
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileRecord {
    /// Whether two records describe the same content.
    ///
    /// Sizes must match and modification times may differ by at most
    /// [`crate::comparison::MTIME_TOLERANCE`], which absorbs timestamp
    /// granularity differences between volumes.
    #[must_use]
    pub fn is_content_equal(&self, other: &Self) -> bool {
        self.size == other.size
            && TimestampComparator::within_tolerance(self.modified, other.modified)
    }
}

/// Snapshot of one directory tree
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    /// Regular files keyed by relative path
    pub files: BTreeMap<PathBuf, FileRecord>,
    /// Non-fatal problems encountered while scanning
    pub warnings: Vec<String>,
}

impl TreeSnapshot {
    /// Look up a file by relative path
    #[must_use]
    pub fn get(&self, rel_path: &Path) -> Option<&FileRecord> {
        self.files.get(rel_path)
    }

    /// Whether the snapshot contains the relative path
    #[must_use]
    pub fn contains(&self, rel_path: &Path) -> bool {
        self.files.contains_key(rel_path)
    }

    /// Number of files in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the snapshot has no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Directory scanner
pub struct Scanner;

impl Scanner {
    /// Scan a directory tree.
    ///
    /// Never fails: a missing root yields an empty snapshot, and unreadable
    /// entries are skipped with a warning.
    #[must_use]
    pub fn scan(root: &Path) -> TreeSnapshot {
        let mut snapshot = TreeSnapshot::default();

        if !root.exists() {
            tracing::debug!(root = %root.display(), "scan root does not exist");
            return snapshot;
        }

        for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    snapshot.warn(format!("Failed to read entry under {}: {e}", root.display()));
                    continue;
                }
            };

            // Symlinks report their own file type since links are not followed
            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    snapshot.warn(format!(
                        "Failed to read metadata for {}: {e}",
                        entry.path().display()
                    ));
                    continue;
                }
            };

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    snapshot.warn(format!(
                        "Failed to get modification time for {}: {e}",
                        entry.path().display()
                    ));
                    continue;
                }
            };

            let Ok(rel_path) = entry.path().strip_prefix(root) else {
                continue;
            };

            snapshot.files.insert(
                rel_path.to_path_buf(),
                FileRecord {
                    path: rel_path.to_path_buf(),
                    size: metadata.len(),
                    modified,
                },
            );
        }

        tracing::trace!(
            root = %root.display(),
            files = snapshot.len(),
            warnings = snapshot.warnings.len(),
            "scanned directory"
        );

        snapshot
    }
}

impl TreeSnapshot {
    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}
