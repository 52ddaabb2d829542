//! File operations executor

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use filetime::FileTime;
use walkdir::WalkDir;

use super::SyncResult;
use super::actions::SyncAction;
use crate::error::Result;
use crate::session_log::SessionLog;

/// Executes sync actions against the filesystem.
///
/// Every action re-checks its origin right before acting: a file that vanished
/// after detection is counted as skipped, not as an error.
pub struct FileOperationExecutor<'a> {
    log: Option<&'a dyn SessionLog>,
}

impl<'a> FileOperationExecutor<'a> {
    /// Create an executor. Applied actions are recorded to `log` when given.
    #[must_use]
    pub const fn new(log: Option<&'a dyn SessionLog>) -> Self {
        Self { log }
    }

    /// Execute a sync action
    ///
    /// # Errors
    ///
    /// Returns an error if the file operation fails for any reason other than
    /// the file having disappeared.
    pub fn execute(&self, action: &SyncAction, result: &mut SyncResult) -> Result<()> {
        match action {
            SyncAction::Create { from, to } | SyncAction::Update { from, to } => {
                if !from.exists() {
                    tracing::debug!(path = %from.display(), "working file vanished, skipping");
                    result.skipped += 1;
                    return Ok(());
                }

                if let Err(e) = Self::copy_file(from, to) {
                    if is_vanished(&e) {
                        result.skipped += 1;
                        return Ok(());
                    }
                    return Err(e);
                }

                if matches!(action, SyncAction::Create { .. }) {
                    result.created += 1;
                } else {
                    result.updated += 1;
                }
                self.record(action.label(), from, Some(to));
            }
            SyncAction::Delete { path } => {
                if !path.exists() {
                    result.skipped += 1;
                    return Ok(());
                }

                match fs::remove_file(path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        result.skipped += 1;
                        return Ok(());
                    }
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("Failed to delete {}", path.display()));
                    }
                }

                result.deleted += 1;
                self.record(action.label(), path, None);
            }
        }
        Ok(())
    }

    fn record(&self, label: &str, source: &Path, target: Option<&Path>) {
        if let Some(log) = self.log {
            log.file_operation(label, source, target);
        }
    }

    /// Copy a file, creating parent directories and preserving its
    /// modification time
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, the copy or the timestamp fails.
    pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::copy(source, dest).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), dest.display())
        })?;

        let metadata = fs::metadata(source)
            .with_context(|| format!("Failed to read metadata: {}", source.display()))?;
        filetime::set_file_mtime(dest, FileTime::from_last_modification_time(&metadata))
            .with_context(|| format!("Failed to set modification time: {}", dest.display()))?;

        Ok(())
    }

    /// Recursively copy a directory tree. Symbolic links are skipped.
    /// Returns the number of files copied.
    ///
    /// # Errors
    ///
    /// Returns an error on the first entry that cannot be read or copied.
    pub fn copy_directory(source: &Path, dest: &Path) -> Result<usize> {
        fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

        let mut copied = 0;
        for entry in WalkDir::new(source).follow_links(false).min_depth(1) {
            let entry = entry
                .with_context(|| format!("Failed to read entry under {}", source.display()))?;
            let rel_path = entry
                .path()
                .strip_prefix(source)
                .with_context(|| format!("Failed to strip prefix from {}", entry.path().display()))?;
            let target = dest.join(rel_path);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
                    .with_context(|| format!("Failed to create directory: {}", target.display()))?;
            } else if entry.file_type().is_file() {
                Self::copy_file(entry.path(), &target)?;
                copied += 1;
            }
        }

        Ok(copied)
    }

    /// Recursively copy a directory tree, carrying on past entries that
    /// vanish or fail. Symbolic links are skipped. `before_copy` runs right
    /// before each file is copied.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dest` itself cannot be created.
    pub fn copy_directory_lenient(
        source: &Path,
        dest: &Path,
        mut before_copy: impl FnMut(&Path),
    ) -> Result<TreeCopy> {
        fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

        let mut report = TreeCopy::default();
        for entry in WalkDir::new(source).follow_links(false).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.io_error().is_some_and(|io| io.kind() == io::ErrorKind::NotFound) {
                        report.skipped += 1;
                    } else {
                        report.fail(format!("Failed to read entry under {}: {e}", source.display()));
                    }
                    continue;
                }
            };
            let Ok(rel_path) = entry.path().strip_prefix(source) else {
                continue;
            };
            let target = dest.join(rel_path);

            if entry.file_type().is_dir() {
                if let Err(e) = fs::create_dir_all(&target) {
                    report.fail(format!("Failed to create directory {}: {e}", target.display()));
                }
            } else if entry.file_type().is_file() {
                before_copy(entry.path());
                match Self::copy_file(entry.path(), &target) {
                    Ok(()) => report.copied += 1,
                    Err(e) if is_vanished(&e) => {
                        tracing::debug!(path = %entry.path().display(), "file vanished during copy, skipping");
                        report.skipped += 1;
                    }
                    Err(e) => report.fail(format!("{e:#}")),
                }
            }
        }

        Ok(report)
    }
}

/// Outcome of a best-effort tree copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeCopy {
    /// Files copied
    pub copied: usize,
    /// Files that vanished before they could be copied
    pub skipped: usize,
    /// Entries that could not be read or copied
    pub errors: Vec<String>,
}

impl TreeCopy {
    fn fail(&mut self, message: String) {
        tracing::warn!("{message}");
        self.errors.push(message);
    }
}

/// Whether an operation failed only because its file is gone
fn is_vanished(error: &anyhow::Error) -> bool {
    error
        .root_cause()
        .downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}
