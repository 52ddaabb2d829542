use anyhow::bail;
use asselect_core::studio::AutomationStudio;

use super::AppContext;
use crate::cli::StudioAction;

pub struct Studio;

impl Studio {
    pub fn execute(ctx: &mut AppContext, action: &StudioAction) -> anyhow::Result<()> {
        match action {
            StudioAction::Add {
                version,
                executable,
            } => {
                if !executable.is_file() {
                    bail!("Executable not found: {}", executable.display());
                }
                let studio = AutomationStudio::for_version(*version, executable.clone());
                println!("✓ Registered {} at {}", studio.display_name(), executable.display());
                ctx.config.upsert_studio(studio);
                ctx.save()?;
            }
            StudioAction::List => {
                if ctx.config.studios.is_empty() {
                    println!("No studios registered");
                    return Ok(());
                }
                for studio in &ctx.config.studios {
                    let marker = if ctx.config.last_selected_studio == Some(studio.version) {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{marker} {} ({}): {}",
                        studio.name,
                        studio.display_name(),
                        studio.executable.display()
                    );
                }
            }
            StudioAction::Remove { version } => {
                let before = ctx.config.studios.len();
                ctx.config.studios.retain(|studio| studio.version != *version);
                if ctx.config.studios.len() == before {
                    bail!("Automation Studio {version} is not registered");
                }
                if ctx.config.last_selected_studio == Some(*version) {
                    ctx.config.last_selected_studio = None;
                }
                ctx.save()?;
                println!("✓ Removed Automation Studio {version}");
            }
        }

        Ok(())
    }
}
