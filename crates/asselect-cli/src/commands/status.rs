use asselect_core::backup::BackupManager;
use asselect_core::comparison::ChangeDetector;
use asselect_core::studio::{ProjectPaths, StudioVersion};

use super::AppContext;

pub struct Status;

impl Status {
    pub fn execute(ctx: &AppContext, version: Option<StudioVersion>) -> anyhow::Result<()> {
        println!("Config directory: {}", ctx.paths.dir.display());

        let Some(root) = ctx.config.project_root.as_deref() else {
            println!("Project root: (not set)");
            return Ok(());
        };
        println!("Project root: {}", root.display());

        match ctx.config.last_selected_studio {
            Some(selected) => println!("Selected studio: Automation Studio {selected}"),
            None => println!("Selected studio: (none)"),
        }

        let settings = ctx.settings_store().get().clone();
        println!(
            "Auto-sync: on close {}, on exit {}, periodic {}",
            on_off(settings.sync_on_studio_close),
            on_off(settings.sync_on_app_close),
            if settings.periodic_enabled {
                format!("every {} min", settings.periodic_interval_minutes)
            } else {
                "off".to_string()
            }
        );

        let studio = match ctx.active_studio(version) {
            Ok(studio) => studio,
            Err(e) if version.is_some() => return Err(e),
            Err(_) => return Ok(()),
        };

        let paths = ProjectPaths::from_root(root);
        let source = paths.libraries_source(&studio.libraries_suffix);
        println!();
        println!("{}", studio.display_name());
        println!("  Source:  {}", source.display());

        if !source.is_dir() {
            println!("  ⚠ Source directory does not exist");
            return Ok(());
        }

        let changes = ChangeDetector::detect(&source, &paths.libraries);
        if changes.is_empty() {
            println!("  ✓ In sync");
        } else {
            println!(
                "  Pending: {} modified, {} new, {} deleted",
                changes.modified.len(),
                changes.new.len(),
                changes.deleted.len()
            );
            if ctx.verbose {
                for change in changes.iter() {
                    println!("    {:<9} {}", change.kind.label(), change.path.display());
                }
            }
        }

        let backups = BackupManager::list_backups(&source);
        match backups.first() {
            Some(latest) => println!("  Backups: {} (latest {})", backups.len(), latest.display()),
            None => println!("  Backups: none"),
        }

        Ok(())
    }
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
