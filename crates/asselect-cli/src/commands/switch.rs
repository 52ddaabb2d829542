use asselect_core::project::ProjectSetup;
use asselect_core::studio::StudioVersion;

use super::{AppContext, session_log};

pub struct Switch;

impl Switch {
    pub fn execute(ctx: &mut AppContext, version: StudioVersion, launch: bool) -> anyhow::Result<()> {
        let studio = ctx.studio(Some(version))?.clone();
        let root = ctx.project_root()?.to_path_buf();

        let log = session_log();
        log.session_started();

        println!("Preparing project for {}...", studio.display_name());
        let setup = ProjectSetup::new(log.clone());
        let result = setup.run(&root, &studio, |step| {
            if ctx.verbose {
                println!("  → {}", step.label());
            }
        });
        if let Err(e) = result {
            log.session_ended();
            return Err(e);
        }

        ctx.config.last_selected_studio = Some(version);
        ctx.save()?;
        println!("✓ Project switched to {}", studio.display_name());

        if launch {
            let child = setup.launch(&root, &studio)?;
            println!("✓ Launched {} (PID {})", studio.display_name(), child.id());
            println!("Run `asselect watch` to sync library changes while it is open");
        }

        log.session_ended();
        Ok(())
    }
}
