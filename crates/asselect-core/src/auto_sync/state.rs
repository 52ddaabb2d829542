//! Per-session sync bookkeeping

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::studio::StudioVersion;
use crate::sync::SyncResult;

/// State of the current auto-sync session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Studio version the session belongs to
    pub studio: Option<StudioVersion>,
    /// Source-of-truth tree changes are mirrored into
    pub source_root: Option<PathBuf>,
    /// Last sync that changed at least one file
    pub last_sync: Option<DateTime<Local>>,
    /// Last time any trigger ran a sync attempt
    pub last_check: Option<DateTime<Local>>,
    /// Files synced during this session
    pub files_synced: usize,
    /// Syncs during this session that changed at least one file
    pub total_syncs: usize,
}

impl SessionState {
    /// Start a fresh session, discarding any previous one
    pub fn begin(&mut self, studio: StudioVersion, source_root: PathBuf) {
        *self = Self {
            studio: Some(studio),
            source_root: Some(source_root),
            ..Self::default()
        };
    }

    /// Return to idle
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a session is active
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.source_root.is_some()
    }

    /// Account for one completed sync attempt
    pub fn record(&mut self, result: &SyncResult, at: DateTime<Local>) {
        self.last_check = Some(at);

        let files = result.files_synced();
        if files > 0 {
            self.last_sync = Some(at);
            self.files_synced += files;
            self.total_syncs += 1;
        }
    }
}

/// Point-in-time view of auto-sync for status displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatistics {
    /// Current session
    pub session: SessionState,
    /// Configured project root
    pub project_root: Option<PathBuf>,
    /// Whether a sync could run right now
    pub can_sync: bool,
    /// Whether periodic checks are enabled
    pub periodic_enabled: bool,
    /// Minutes between periodic checks
    pub periodic_interval_minutes: u32,
    /// Studio processes currently tracked
    pub running_processes: usize,
}
