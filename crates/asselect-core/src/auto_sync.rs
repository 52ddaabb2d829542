//! Auto-sync orchestration across triggers and sessions
//!
//! [`AutoSyncManager`] mirrors the working copy into the active session's
//! source of truth when one of four triggers fires: the periodic timer, a
//! watched studio process exiting, an explicit request, or the session ending.
//! At most one sync runs at a time; a trigger arriving meanwhile is dropped.
//!
//! The manager owns no threads. A driver calls [`AutoSyncManager::poll`] and
//! sleeps until [`AutoSyncManager::next_deadline`]. Every method takes `&self`
//! so the manager can be shared through an `Arc` with a worker running the
//! project setup.

mod state;
mod timer;


use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use chrono::Local;

pub use state::{SessionState, SyncStatistics};
pub use timer::IntervalTimer;

use crate::comparison::ChangeDetector;
use crate::config::{SettingsStore, SyncSettings};
use crate::error::{Result, SessionError};
use crate::process::{ProcessWatcher, TrackedProcess};
use crate::session_log::SessionLog;
use crate::studio::{AutomationStudio, ProjectPaths};
use crate::sync::{SyncEngine, SyncResult};

/// Period of the studio process scan, independent of the periodic sync
pub const PROCESS_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// What caused a sync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// Periodic timer tick
    Periodic,
    /// A watched studio process exited
    StudioClosed,
    /// Explicit user request
    Manual,
    /// The session or application is ending
    AppClose,
}

impl SyncTrigger {
    /// Short label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Periodic => "periodic",
            Self::StudioClosed => "studio closed",
            Self::Manual => "manual",
            Self::AppClose => "app close",
        }
    }
}

/// Why a sync cannot run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncBlocker {
    /// No project root configured
    #[error("no project root is configured")]
    NoProjectRoot,
    /// No studio session is active
    #[error("no Automation Studio session is active")]
    NoSession,
    /// The session's source of truth does not exist
    #[error("source directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),
}

/// Result of one sync attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The sync ran; the result may be empty
    Synced(SyncResult),
    /// Preconditions not met
    Blocked(SyncBlocker),
    /// Another sync was in flight; this attempt was dropped
    Busy,
    /// The trigger is switched off in settings
    Disabled,
}

impl SyncOutcome {
    /// Files acted upon; zero unless the sync ran
    #[must_use]
    pub const fn files_synced(&self) -> usize {
        match self {
            Self::Synced(result) => result.files_synced(),
            _ => 0,
        }
    }
}

/// Notification sent to subscribers after every sync that ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The sync finished without errors
    Completed {
        /// What caused it
        trigger: SyncTrigger,
        /// Files acted upon
        files: usize,
    },
    /// The sync finished but some operations failed
    Failed {
        /// What caused it
        trigger: SyncTrigger,
        /// Per-file error messages
        errors: Vec<String>,
    },
}

/// Callback receiving [`SyncEvent`]s
pub type SyncListener = Arc<dyn Fn(&SyncEvent) + Send + Sync>;

struct Timers {
    monitoring: bool,
    process_poll: IntervalTimer,
    periodic: IntervalTimer,
}

/// Marks a sync as in flight until dropped
struct SyncGuard<'a>(&'a AtomicBool);

impl<'a> SyncGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates automatic syncs for the active studio session
pub struct AutoSyncManager {
    store: RwLock<SettingsStore>,
    project_root: RwLock<Option<PathBuf>>,
    session: Mutex<SessionState>,
    watcher: Mutex<ProcessWatcher>,
    timers: Mutex<Timers>,
    engine: SyncEngine,
    log: Arc<dyn SessionLog>,
    listeners: RwLock<Vec<SyncListener>>,
    in_flight: AtomicBool,
}

impl AutoSyncManager {
    /// Manager watching the host process table
    #[must_use]
    pub fn new(store: SettingsStore, log: Arc<dyn SessionLog>) -> Self {
        Self::with_watcher(store, ProcessWatcher::new(), log)
    }

    /// Manager with a custom process watcher
    #[must_use]
    pub fn with_watcher(store: SettingsStore, watcher: ProcessWatcher, log: Arc<dyn SessionLog>) -> Self {
        let interval = store.get().periodic_interval();
        Self {
            store: RwLock::new(store),
            project_root: RwLock::new(None),
            session: Mutex::new(SessionState::default()),
            watcher: Mutex::new(watcher),
            timers: Mutex::new(Timers {
                monitoring: false,
                process_poll: IntervalTimer::new(PROCESS_POLL_INTERVAL),
                periodic: IntervalTimer::new(interval),
            }),
            engine: SyncEngine::new(log.clone()),
            log,
            listeners: RwLock::new(Vec::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Set the project whose `Logical/` tree is synced
    pub fn set_project_root(&self, root: &Path) {
        *write(&self.project_root) = Some(root.to_path_buf());
    }

    /// Configured project root
    #[must_use]
    pub fn project_root(&self) -> Option<PathBuf> {
        read(&self.project_root).clone()
    }

    /// Watch a studio's executable for start and exit
    pub fn register_studio(&self, studio: &AutomationStudio) {
        lock(&self.watcher).add_executable(&studio.executable);
    }

    /// Begin a session for `studio`, replacing any active one.
    /// Returns the session's source of truth.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ProjectRootNotSet`] if no project root is set.
    pub fn start_session(&self, studio: &AutomationStudio) -> Result<PathBuf> {
        let root = self.project_root().ok_or(SessionError::ProjectRootNotSet)?;
        let source = ProjectPaths::from_root(&root).libraries_source(&studio.libraries_suffix);

        lock(&self.session).begin(studio.version, source.clone());
        self.register_studio(studio);

        tracing::info!(studio = %studio.version, source = %source.display(), "Auto-sync session started");
        self.log.project_operation(
            "Auto-sync session started",
            Some(&format!("{} -> {}", studio.display_name(), source.display())),
        );

        Ok(source)
    }

    /// Source of truth and working copy of the active session, if a sync
    /// could run now
    ///
    /// # Errors
    ///
    /// Returns the first unmet precondition.
    pub fn sync_paths(&self) -> std::result::Result<(PathBuf, PathBuf), SyncBlocker> {
        let root = self.project_root().ok_or(SyncBlocker::NoProjectRoot)?;
        let source = lock(&self.session)
            .source_root
            .clone()
            .ok_or(SyncBlocker::NoSession)?;

        if !source.is_dir() {
            return Err(SyncBlocker::SourceMissing(source));
        }

        Ok((source, ProjectPaths::from_root(&root).libraries))
    }

    /// Whether a sync could run now
    #[must_use]
    pub fn can_sync(&self) -> bool {
        self.sync_paths().is_ok()
    }

    /// Periodic trigger: syncs only if the trees differ
    pub fn on_periodic_tick(&self) -> SyncOutcome {
        if !self.settings().periodic_enabled {
            return SyncOutcome::Disabled;
        }
        self.run_sync(SyncTrigger::Periodic, true)
    }

    /// Studio-closed trigger: syncs unconditionally
    pub fn on_studio_closed(&self, process: &TrackedProcess) -> SyncOutcome {
        self.log.project_operation(
            "Studio process exited",
            Some(&format!("PID {} ({})", process.pid, process.executable.display())),
        );

        if !self.settings().sync_on_studio_close {
            return SyncOutcome::Disabled;
        }
        self.run_sync(SyncTrigger::StudioClosed, false)
    }

    /// Manual trigger: ignores the trigger switches in settings
    pub fn sync_now(&self) -> SyncOutcome {
        self.run_sync(SyncTrigger::Manual, false)
    }

    /// End the active session, syncing one last time if configured.
    /// Returns the final sync's outcome when one was attempted.
    pub fn end_session(&self) -> Option<SyncOutcome> {
        self.finish_session(true)
    }

    /// End the active session without the final sync, e.g. when the project
    /// was switched to another studio and the working copy no longer belongs
    /// to this session's source of truth
    pub fn discard_session(&self) {
        self.finish_session(false);
    }

    /// End the session and stop all timers and process watching
    pub fn shutdown(&self) -> Option<SyncOutcome> {
        let outcome = self.end_session();

        {
            let mut timers = lock(&self.timers);
            timers.monitoring = false;
            timers.process_poll.stop();
            timers.periodic.stop();
        }
        lock(&self.watcher).stop();

        tracing::info!("Auto-sync stopped");
        outcome
    }

    /// Arm the process-poll timer and, if enabled, the periodic timer
    pub fn start_monitoring(&self, now: Instant) {
        {
            let mut timers = lock(&self.timers);
            timers.monitoring = true;
            timers.process_poll.start(now);
        }
        self.restart_periodic(now);
    }

    /// Current settings
    #[must_use]
    pub fn settings(&self) -> SyncSettings {
        read(&self.store).get().clone()
    }

    /// Validate and persist new settings, then restart the periodic timer
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or cannot be saved.
    pub fn update_settings(&self, settings: SyncSettings) -> Result<()> {
        write(&self.store).update(settings)?;
        self.restart_periodic(Instant::now());
        Ok(())
    }

    /// Re-read settings from disk, then restart the periodic timer
    pub fn reload_settings(&self) {
        write(&self.store).load();
        self.restart_periodic(Instant::now());
    }

    fn restart_periodic(&self, now: Instant) {
        let settings = self.settings();
        let mut timers = lock(&self.timers);

        timers.periodic.set_period(settings.periodic_interval(), now);
        if timers.monitoring && settings.periodic_enabled {
            timers.periodic.start(now);
        } else {
            timers.periodic.stop();
        }

        tracing::debug!(
            enabled = timers.periodic.is_active(),
            minutes = settings.periodic_interval_minutes,
            "Periodic sync timer configured"
        );
    }

    /// Fire every timer due at `now`. Process scans run new-then-closed, and
    /// each closure is dispatched as a studio-closed trigger.
    pub fn poll(&self, now: Instant) -> Vec<SyncOutcome> {
        let (poll_due, periodic_due) = {
            let mut timers = lock(&self.timers);
            (timers.process_poll.fire(now), timers.periodic.fire(now))
        };

        let mut outcomes = Vec::new();

        if poll_due {
            let (started, closed) = {
                let mut watcher = lock(&self.watcher);
                (watcher.scan_for_new(), watcher.scan_for_closed())
            };

            for process in &started {
                self.log.project_operation(
                    "Studio process started",
                    Some(&format!("PID {} ({})", process.pid, process.executable.display())),
                );
            }
            for process in &closed {
                outcomes.push(self.on_studio_closed(process));
            }
        }

        if periodic_due {
            outcomes.push(self.on_periodic_tick());
        }

        outcomes
    }

    /// Earliest instant at which [`Self::poll`] has work
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let timers = lock(&self.timers);
        [timers.process_poll.next_deadline(), timers.periodic.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Register a listener for sync events
    pub fn subscribe(&self, listener: impl Fn(&SyncEvent) + Send + Sync + 'static) {
        write(&self.listeners).push(Arc::new(listener));
    }

    /// Snapshot for status displays
    #[must_use]
    pub fn statistics(&self) -> SyncStatistics {
        let settings = self.settings();
        let session = lock(&self.session).clone();
        SyncStatistics {
            session,
            project_root: self.project_root(),
            can_sync: self.can_sync(),
            periodic_enabled: settings.periodic_enabled,
            periodic_interval_minutes: settings.periodic_interval_minutes,
            running_processes: lock(&self.watcher).running().count(),
        }
    }

    /// Whether any watched studio is running. Prunes exited processes first.
    #[must_use]
    pub fn is_studio_running(&self) -> bool {
        lock(&self.watcher).is_any_running()
    }

    fn finish_session(&self, final_sync: bool) -> Option<SyncOutcome> {
        let active = lock(&self.session).is_active();
        let outcome = (active && final_sync && self.settings().sync_on_app_close)
            .then(|| self.run_sync(SyncTrigger::AppClose, false));

        if active {
            let state = lock(&self.session).clone();
            self.log.project_operation(
                "Auto-sync session ended",
                Some(&format!(
                    "{} files synced in {} syncs",
                    state.files_synced, state.total_syncs
                )),
            );
        }

        lock(&self.session).reset();
        outcome
    }

    fn run_sync(&self, trigger: SyncTrigger, only_if_changed: bool) -> SyncOutcome {
        let (source, working) = match self.sync_paths() {
            Ok(paths) => paths,
            Err(blocker) => {
                tracing::debug!(trigger = trigger.label(), "Sync skipped: {blocker}");
                return SyncOutcome::Blocked(blocker);
            }
        };

        let Some(_guard) = SyncGuard::acquire(&self.in_flight) else {
            tracing::debug!(trigger = trigger.label(), "Sync already in progress, dropping trigger");
            return SyncOutcome::Busy;
        };

        let settings = self.settings();
        let result = if only_if_changed && !ChangeDetector::has_changes(&source, &working) {
            SyncResult::default()
        } else {
            self.engine.perform_full_sync(&source, &working, &settings)
        };

        self.record(trigger, &result);
        SyncOutcome::Synced(result)
    }

    fn record(&self, trigger: SyncTrigger, result: &SyncResult) {
        lock(&self.session).record(result, Local::now());

        let files = result.files_synced();
        if files > 0 {
            tracing::info!(trigger = trigger.label(), files, "Auto-sync completed");
            self.log.project_operation(
                "Auto-sync completed",
                Some(&format!("{files} files synced ({})", trigger.label())),
            );
        }

        let event = if result.is_success() {
            SyncEvent::Completed { trigger, files }
        } else {
            SyncEvent::Failed {
                trigger,
                errors: result.errors.clone(),
            }
        };

        // Listeners may subscribe more listeners
        let listeners = read(&self.listeners).clone();
        for listener in &listeners {
            listener(&event);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
