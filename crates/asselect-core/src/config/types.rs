//! Auto-sync settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::validation::SettingsValidator;
use crate::error::SettingsError;

/// User-tunable auto-sync behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SyncSettings {
    /// Sync when a watched studio process exits
    pub sync_on_studio_close: bool,

    /// Sync once more when the session ends
    pub sync_on_app_close: bool,

    /// Check for changes on a timer
    pub periodic_enabled: bool,

    /// Minutes between periodic checks, 1 to 60
    pub periodic_interval_minutes: u32,

    /// Report every applied change to the session log
    pub log_operations: bool,

    /// Back up the source of truth before writing to it
    pub backup_before_sync: bool,

    /// Backups to retain, 0 to 10. Zero disables backups.
    pub max_backups: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            sync_on_studio_close: true,
            sync_on_app_close: true,
            periodic_enabled: true,
            periodic_interval_minutes: 5,
            log_operations: true,
            backup_before_sync: true,
            max_backups: 3,
        }
    }
}

impl SyncSettings {
    /// Period of the periodic check timer
    #[must_use]
    pub fn periodic_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.periodic_interval_minutes) * 60)
    }

    /// Whether a sync should take a backup first
    #[must_use]
    pub const fn backups_enabled(&self) -> bool {
        self.backup_before_sync && self.max_backups > 0
    }

    /// Check every field against its accepted range
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        SettingsValidator::validate(self)
    }
}
