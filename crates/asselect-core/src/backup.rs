//! Timestamped backups of the source-of-truth tree
//!
//! Backups live next to the tree they protect:
//! `<parent>/<name>_backup/<YYYYmmdd_HHMMSS>`. Backups are best-effort: files
//! that vanish or cannot be copied are skipped and logged, and a backup
//! directory that cannot be created is reported as "no backup", never as an
//! error that could stop the sync that asked for it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;

use crate::error::Result;
use crate::sync::FileOperationExecutor;

/// Backup manager
pub struct BackupManager;

impl BackupManager {
    /// `chrono` format of backup directory names
    pub const TIMESTAMP_FORMAT: &'static str = "%Y%m%d_%H%M%S";

    /// Directory that holds every backup of `source_root`
    #[must_use]
    pub fn backup_root(source_root: &Path) -> Option<PathBuf> {
        let name = source_root.file_name()?.to_string_lossy();
        let parent = source_root.parent()?;
        Some(parent.join(format!("{name}_backup")))
    }

    /// Copy `source_root` into a new timestamped backup, then prune the oldest
    /// backups so that at most `max_backups` remain.
    ///
    /// Returns the new backup directory, or `None` when the source is missing,
    /// `max_backups` is zero, or the backup directory could not be created.
    pub fn backup(source_root: &Path, max_backups: u32) -> Option<PathBuf> {
        Self::backup_with(source_root, max_backups, |_| {})
    }

    fn backup_with(
        source_root: &Path,
        max_backups: u32,
        before_copy: impl FnMut(&Path),
    ) -> Option<PathBuf> {
        if max_backups == 0 {
            tracing::debug!(source = %source_root.display(), "backups disabled");
            return None;
        }
        if !source_root.is_dir() {
            tracing::debug!(source = %source_root.display(), "nothing to back up");
            return None;
        }

        let backup_root = Self::backup_root(source_root)?;

        let target = match Self::create(source_root, &backup_root, before_copy) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(source = %source_root.display(), "Backup failed: {e:#}");
                return None;
            }
        };

        let removed = Self::prune(&backup_root, max_backups as usize);
        tracing::info!(
            backup = %target.display(),
            pruned = removed,
            "Created backup"
        );

        Some(target)
    }

    /// Existing backups of `source_root`, newest first
    #[must_use]
    pub fn list_backups(source_root: &Path) -> Vec<PathBuf> {
        Self::backup_root(source_root)
            .map(|root| Self::sorted_backups(&root))
            .unwrap_or_default()
    }

    fn create(
        source_root: &Path,
        backup_root: &Path,
        before_copy: impl FnMut(&Path),
    ) -> Result<PathBuf> {
        fs::create_dir_all(backup_root)
            .with_context(|| format!("Failed to create directory: {}", backup_root.display()))?;

        let stamp = chrono::Local::now().format(Self::TIMESTAMP_FORMAT).to_string();
        let target = Self::unique_target(backup_root, &stamp);

        let report = FileOperationExecutor::copy_directory_lenient(source_root, &target, before_copy)?;
        if !report.errors.is_empty() {
            tracing::warn!(
                backup = %target.display(),
                copied = report.copied,
                skipped = report.skipped,
                failed = report.errors.len(),
                "Backup is incomplete"
            );
        }

        Ok(target)
    }

    /// The stamp itself, or `<stamp>_NNN` one above the highest suffix already
    /// used for that stamp. Names are never reused, even after pruning.
    fn unique_target(backup_root: &Path, stamp: &str) -> PathBuf {
        let prefix = format!("{stamp}_");
        let mut highest: Option<u32> = None;

        if let Ok(entries) = fs::read_dir(backup_root) {
            for entry in entries.flatten() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                let suffix = if name == stamp {
                    Some(0)
                } else {
                    name.strip_prefix(&prefix).and_then(|n| n.parse::<u32>().ok())
                };
                highest = highest.max(suffix);
            }
        }

        match highest {
            None => backup_root.join(stamp),
            Some(n) => backup_root.join(format!("{stamp}_{:03}", n + 1)),
        }
    }

    /// Delete every backup beyond the newest `keep`. Returns how many went.
    fn prune(backup_root: &Path, keep: usize) -> usize {
        let mut removed = 0;

        for stale in Self::sorted_backups(backup_root).into_iter().skip(keep) {
            match fs::remove_dir_all(&stale) {
                Ok(()) => {
                    tracing::debug!(backup = %stale.display(), "Removed old backup");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(backup = %stale.display(), "Failed to remove old backup: {e}");
                }
            }
        }

        removed
    }

    /// Backup directories ordered by creation time, newest first. Falls back to
    /// modification time where creation time is unavailable, and breaks ties by
    /// name.
    fn sorted_backups(backup_root: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(backup_root) else {
            return Vec::new();
        };

        let mut backups: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let metadata = entry.metadata().ok()?;
                if !metadata.is_dir() {
                    return None;
                }
                let created = metadata
                    .created()
                    .or_else(|_| metadata.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                Some((created, entry.path()))
            })
            .collect();

        backups.sort_by(|a, b| b.cmp(a));
        backups.into_iter().map(|(_, path)| path).collect()
    }
}
