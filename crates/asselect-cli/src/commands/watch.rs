//! Foreground auto-sync loop

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use asselect_core::auto_sync::SyncEvent;
use asselect_core::config::AppConfig;
use asselect_core::studio::StudioVersion;

use super::{AppContext, report_skipped, session_log};

static WATCHING: AtomicBool = AtomicBool::new(false);
static STOP: AtomicBool = AtomicBool::new(false);

/// Upper bound on one sleep so Ctrl+C and settings edits are noticed promptly
const TICK: Duration = Duration::from_millis(250);

pub struct Watch;

impl Watch {
    /// Ask a running watch loop to stop. Returns false if none is running.
    pub fn interrupt() -> bool {
        if WATCHING.load(Ordering::Acquire) {
            STOP.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    pub fn execute(ctx: &AppContext, version: Option<StudioVersion>) -> anyhow::Result<()> {
        let root = ctx.project_root()?;
        let studio = ctx.active_studio(version)?;
        let log = session_log();
        let manager = ctx.manager()?;

        log.session_started();
        let source = manager.start_session(studio)?;

        let verbose = ctx.verbose;
        manager.subscribe(move |event| match event {
            SyncEvent::Completed { trigger, files: 0 } => {
                if verbose {
                    println!("No changes ({})", trigger.label());
                }
            }
            SyncEvent::Completed { trigger, files } => {
                println!("✓ Synced {files} file(s) ({})", trigger.label());
            }
            SyncEvent::Failed { trigger, errors } => {
                println!("✗ Sync ({}) finished with {} error(s)", trigger.label(), errors.len());
                for error in errors {
                    println!("  {error}");
                }
            }
        });

        println!("Watching {} for {}", studio.executable.display(), studio.display_name());
        println!("Source of truth: {}", source.display());
        println!("Press Ctrl+C to stop");

        STOP.store(false, Ordering::Release);
        WATCHING.store(true, Ordering::Release);

        let settings_path = ctx.paths.settings_file.clone();
        let mut settings_mtime = modified(&settings_path);
        let mut was_running = false;
        let mut discarded = None;

        manager.start_monitoring(Instant::now());

        while !STOP.load(Ordering::Acquire) {
            if !still_selected(&ctx.paths.app_file, root, studio.version) {
                println!(
                    "Project was switched away from {}, ending session without syncing",
                    studio.display_name()
                );
                discarded = Some(manager.statistics().session);
                manager.discard_session();
                break;
            }

            let now = Instant::now();
            for outcome in manager.poll(now) {
                report_skipped(&outcome, ctx.verbose);
            }

            let running = manager.is_studio_running();
            if running != was_running {
                if running {
                    println!("{} started", studio.display_name());
                } else {
                    println!("{} closed", studio.display_name());
                }
                was_running = running;
            }

            let mtime = modified(&settings_path);
            if mtime != settings_mtime {
                settings_mtime = mtime;
                manager.reload_settings();
                println!("Settings reloaded");
            }

            let wait = manager
                .next_deadline()
                .map_or(TICK, |deadline| deadline.saturating_duration_since(Instant::now()))
                .min(TICK);
            thread::sleep(wait);
        }

        WATCHING.store(false, Ordering::Release);
        println!("\nStopping...");

        let session = discarded.unwrap_or_else(|| manager.statistics().session);
        let (mut files, mut syncs) = (session.files_synced, session.total_syncs);
        if let Some(outcome) = manager.shutdown() {
            report_skipped(&outcome, ctx.verbose);
            if outcome.files_synced() > 0 {
                files += outcome.files_synced();
                syncs += 1;
            }
        }
        println!("Session ended: {files} file(s) synced in {syncs} sync(s)");

        log.session_ended();
        Ok(())
    }
}

/// Whether the config on disk still points at this session's project and
/// studio. Another `asselect switch` rewires `Logical/Libraries` underneath us.
fn still_selected(app_file: &Path, root: &Path, version: StudioVersion) -> bool {
    match AppConfig::load(app_file) {
        Ok(config) => {
            config.last_selected_studio == Some(version) && config.project_root.as_deref() == Some(root)
        }
        Err(e) => {
            tracing::warn!("Failed to reload {}: {e:#}", app_file.display());
            true
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
