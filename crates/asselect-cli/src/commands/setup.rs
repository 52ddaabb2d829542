use std::fs;
use std::path::Path;

use anyhow::Context;
use asselect_core::project::ProjectSetup;
use asselect_core::studio::ProjectPaths;

use super::AppContext;

pub struct Setup;

impl Setup {
    pub fn execute(ctx: &mut AppContext, project_root: &Path) -> anyhow::Result<()> {
        let root = std::path::absolute(project_root)
            .with_context(|| format!("Invalid path: {}", project_root.display()))?;
        let paths = ProjectPaths::from_root(&root);

        ProjectSetup::validate_structure(&paths)?;

        ctx.config.project_root = Some(root.clone());
        ctx.save()?;

        println!("✓ Project root set to {}", root.display());

        let sources = library_sources(&paths.logical);
        if sources.is_empty() {
            println!("⚠ No Libraries_<version> directories found in {}", paths.logical.display());
        } else {
            println!("Library sources: {}", sources.join(", "));
        }

        Ok(())
    }
}

fn library_sources(logical: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(logical) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with("Libraries_") && !name.ends_with("_backup"))
        .collect();
    names.sort();
    names
}
