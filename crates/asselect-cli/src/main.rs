mod cli;
mod commands;
mod logging;

use anyhow::Context;
use asselect_core::config::ConfigDiscovery;
use clap::Parser;
use cli::{Cli, Commands};
use commands::AppContext;

fn main() -> anyhow::Result<()> {
    // A running watch loop gets to end its session; anything else exits at once
    ctrlc::set_handler(|| {
        if !commands::Watch::interrupt() {
            eprintln!("\n\nInterrupted by user (Ctrl+C)");
            std::process::exit(130);
        }
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    let paths = ConfigDiscovery::discover(cli.config_dir.as_deref())
        .context("Failed to locate config directory")?;

    let session_dir = cli
        .command
        .writes_session_log()
        .then_some(paths.log_dir.as_path());
    let _guard = logging::init(cli.verbose, session_dir)?;

    if cli.verbose {
        println!("Verbose mode enabled");
        println!("Config directory: {}", paths.dir.display());
    }

    let mut ctx = AppContext::load(paths, cli.verbose)?;

    match &cli.command {
        Commands::Setup { project_root } => {
            commands::Setup::execute(&mut ctx, project_root)
                .context("Failed to execute setup command")?;
        }
        Commands::Studio { action } => {
            commands::Studio::execute(&mut ctx, action)
                .context("Failed to execute studio command")?;
        }
        Commands::Switch { version, launch } => {
            commands::Switch::execute(&mut ctx, *version, *launch)
                .context("Failed to execute switch command")?;
        }
        Commands::Sync { version, dry_run } => {
            commands::Sync::execute(&ctx, *version, *dry_run)
                .context("Failed to execute sync command")?;
        }
        Commands::Status { version } => {
            commands::Status::execute(&ctx, *version).context("Failed to execute status command")?;
        }
        Commands::Watch { version } => {
            commands::Watch::execute(&ctx, *version).context("Failed to execute watch command")?;
        }
        Commands::Settings { action } => {
            commands::Settings::execute(&ctx, action.as_ref())
                .context("Failed to execute settings command")?;
        }
    }

    Ok(())
}
