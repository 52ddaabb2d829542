//! State shared by every command

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use asselect_core::auto_sync::{AutoSyncManager, SyncOutcome};
use asselect_core::config::{AppConfig, ConfigPaths, SettingsStore};
use asselect_core::session_log::TracingSessionLog;
use asselect_core::studio::{AutomationStudio, StudioVersion};

/// Loaded configuration plus where it lives
pub struct AppContext {
    pub paths: ConfigPaths,
    pub config: AppConfig,
    pub verbose: bool,
}

impl AppContext {
    pub fn load(paths: ConfigPaths, verbose: bool) -> anyhow::Result<Self> {
        let config = AppConfig::load(&paths.app_file)
            .with_context(|| format!("Failed to load {}", paths.app_file.display()))?;

        Ok(Self {
            paths,
            config,
            verbose,
        })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.config.save(&self.paths.app_file)
    }

    pub fn project_root(&self) -> anyhow::Result<&Path> {
        self.config
            .project_root
            .as_deref()
            .context("No project root configured. Run `asselect setup <PATH>` first")
    }

    /// Registered studio for `version`, or for the last selected version
    pub fn studio(&self, version: Option<StudioVersion>) -> anyhow::Result<&AutomationStudio> {
        let version = version.or(self.config.last_selected_studio).context(
            "No studio selected. Pass a version or run `asselect switch <VERSION>` first",
        )?;

        self.config.find_studio(version).with_context(|| {
            format!(
                "Automation Studio {version} is not registered. \
                 Run `asselect studio add {version} <EXECUTABLE>` first"
            )
        })
    }

    /// The studio the project is currently switched to. An explicit `version`
    /// must match it, since `Logical/Libraries` holds only that studio's copy.
    pub fn active_studio(&self, version: Option<StudioVersion>) -> anyhow::Result<&AutomationStudio> {
        let selected = self
            .config
            .last_selected_studio
            .context("No studio selected. Run `asselect switch <VERSION>` first")?;

        if let Some(requested) = version.filter(|requested| *requested != selected) {
            bail!(
                "Project is switched to Automation Studio {selected}, not {requested}. \
                 Run `asselect switch {requested}` first"
            );
        }

        self.studio(Some(selected))
    }

    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::open(&self.paths.settings_file)
    }

    /// Auto-sync manager for the configured project, logging to the session file
    pub fn manager(&self) -> anyhow::Result<AutoSyncManager> {
        let root = self.project_root()?;
        let manager = AutoSyncManager::new(self.settings_store(), session_log());
        manager.set_project_root(root);
        Ok(manager)
    }
}

/// Session log routed to the session file by the subscriber
pub fn session_log() -> Arc<TracingSessionLog> {
    Arc::new(TracingSessionLog)
}

/// Report a trigger that did not run. Completed syncs are reported through
/// the manager's listeners.
pub fn report_skipped(outcome: &SyncOutcome, verbose: bool) {
    match outcome {
        SyncOutcome::Blocked(reason) => println!("⚠ Sync skipped: {reason}"),
        SyncOutcome::Busy if verbose => println!("Sync already in progress, skipped"),
        SyncOutcome::Synced(_) | SyncOutcome::Busy | SyncOutcome::Disabled => {}
    }
}
