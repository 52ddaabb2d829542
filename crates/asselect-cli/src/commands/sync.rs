use anyhow::bail;
use asselect_core::auto_sync::SyncOutcome;
use asselect_core::comparison::ChangeDetector;
use asselect_core::studio::{ProjectPaths, StudioVersion};
use asselect_core::sync::SyncReporter;

use super::{AppContext, session_log};

pub struct Sync;

impl Sync {
    pub fn execute(
        ctx: &AppContext,
        version: Option<StudioVersion>,
        dry_run: bool,
    ) -> anyhow::Result<()> {
        let root = ctx.project_root()?;
        let studio = ctx.active_studio(version)?;

        if dry_run {
            let paths = ProjectPaths::from_root(root);
            let source = paths.libraries_source(&studio.libraries_suffix);
            let changes = ChangeDetector::detect(&source, &paths.libraries);

            if changes.is_empty() {
                println!("No changes between {} and {}", paths.libraries.display(), source.display());
                return Ok(());
            }
            println!("[DRY RUN] {} pending change(s):", changes.len());
            for change in changes.iter() {
                println!("  {:<9} {}", change.kind.label(), change.path.display());
            }
            return Ok(());
        }

        let log = session_log();
        log.session_started();

        let manager = ctx.manager()?;
        let source = manager.start_session(studio)?;
        if ctx.verbose {
            println!("Syncing into {}", source.display());
        }

        let outcome = manager.sync_now();
        manager.shutdown();
        log.session_ended();

        match outcome {
            SyncOutcome::Synced(result) => {
                println!("{}", SyncReporter::generate_summary(&result));
                if !result.is_success() {
                    bail!("Sync completed with {} error(s)", result.errors.len());
                }
            }
            SyncOutcome::Blocked(reason) => bail!("Cannot sync: {reason}"),
            SyncOutcome::Busy => bail!("Another sync is already running"),
            SyncOutcome::Disabled => {}
        }

        Ok(())
    }
}
