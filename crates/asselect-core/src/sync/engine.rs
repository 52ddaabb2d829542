//! Sync engine - detect, back up, apply

use std::path::Path;
use std::sync::Arc;

use super::SyncResult;
use super::actions::SyncActionResolver;
use super::executor::FileOperationExecutor;
use crate::backup::BackupManager;
use crate::comparison::{ChangeDetector, ChangeSet};
use crate::config::SyncSettings;
use crate::session_log::SessionLog;

/// Mirrors working-copy changes into the source-of-truth tree
pub struct SyncEngine {
    log: Arc<dyn SessionLog>,
}

impl SyncEngine {
    /// Create a sync engine reporting to `log`
    #[must_use]
    pub fn new(log: Arc<dyn SessionLog>) -> Self {
        Self { log }
    }

    /// Apply a change set.
    ///
    /// Takes one backup first when backups are enabled. Per-file failures are
    /// logged and collected in [`SyncResult::errors`]; the remaining changes
    /// are still applied.
    #[must_use]
    pub fn apply(
        &self,
        source_root: &Path,
        working_root: &Path,
        changes: &ChangeSet,
        settings: &SyncSettings,
    ) -> SyncResult {
        let mut result = SyncResult::default();
        if changes.is_empty() {
            return result;
        }

        if settings.backups_enabled() {
            result.backup = BackupManager::backup(source_root, settings.max_backups);
            if settings.log_operations {
                if let Some(backup) = &result.backup {
                    self.log
                        .file_operation("Backup created", source_root, Some(backup));
                }
            }
        }

        let log = settings.log_operations.then_some(&*self.log);
        let executor = FileOperationExecutor::new(log);

        for action in SyncActionResolver::resolve(source_root, working_root, changes) {
            if let Err(e) = executor.execute(&action, &mut result) {
                let message = format!("{e:#}");
                tracing::warn!("Sync operation failed: {message}");
                self.log.error("Sync operation failed", Some(&message));
                result.errors.push(message);
            }
        }

        tracing::info!(
            source = %source_root.display(),
            created = result.created,
            updated = result.updated,
            deleted = result.deleted,
            skipped = result.skipped,
            errors = result.errors.len(),
            "Applied changes"
        );

        result
    }

    /// Detect and apply in one step. Returns an empty result without touching
    /// disk when the trees already match.
    #[must_use]
    pub fn perform_full_sync(
        &self,
        source_root: &Path,
        working_root: &Path,
        settings: &SyncSettings,
    ) -> SyncResult {
        let changes = ChangeDetector::detect(source_root, working_root);
        if changes.is_empty() {
            tracing::debug!(source = %source_root.display(), "No changes to sync");
            return SyncResult::default();
        }

        self.apply(source_root, working_root, &changes, settings)
    }
}
