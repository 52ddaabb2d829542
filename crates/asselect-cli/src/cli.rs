use std::path::PathBuf;

use asselect_core::studio::StudioVersion;
use clap::{Parser, Subcommand};

/// Automation Studio Selector
///
/// Switch a project between installed Automation Studio versions and mirror
/// library changes back to the version-specific source of truth
#[derive(Parser, Debug)]
#[command(name = "asselect")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use a specific config directory
    #[arg(long, global = true, value_name = "DIR", env = "ASSELECT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set the project root (must contain Logical/ and Physical/)
    Setup {
        /// Project root directory
        project_root: PathBuf,
    },

    /// Manage installed Automation Studio versions
    Studio {
        #[command(subcommand)]
        action: StudioAction,
    },

    /// Rewire the project for a studio version
    Switch {
        /// Studio version (4.5 or 6)
        version: StudioVersion,

        /// Open the project with the studio afterwards
        #[arg(long)]
        launch: bool,
    },

    /// Mirror working-copy changes into the version's libraries now
    Sync {
        /// Studio version (default: last selected)
        version: Option<StudioVersion>,

        /// List pending changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show configuration, pending changes and backups
    Status {
        /// Studio version (default: last selected)
        version: Option<StudioVersion>,
    },

    /// Watch the studio process and auto-sync until interrupted
    Watch {
        /// Studio version (default: last selected)
        version: Option<StudioVersion>,
    },

    /// Show or change auto-sync settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

impl Commands {
    /// Whether the command touches project files and gets a session log
    pub const fn writes_session_log(&self) -> bool {
        matches!(
            self,
            Self::Switch { .. } | Self::Sync { dry_run: false, .. } | Self::Watch { .. }
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum StudioAction {
    /// Register an installed studio
    Add {
        /// Studio version (4.5 or 6)
        version: StudioVersion,

        /// Path to the studio executable
        executable: PathBuf,
    },

    /// List registered studios
    List,

    /// Unregister a studio
    Remove {
        /// Studio version (4.5 or 6)
        version: StudioVersion,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print current settings (default)
    Show,

    /// Change one or more settings
    Set(SettingsArgs),

    /// Restore defaults
    Reset,
}

#[derive(clap::Args, Debug, Default)]
pub struct SettingsArgs {
    /// Sync when the studio closes
    #[arg(long, value_name = "BOOL")]
    pub sync_on_studio_close: Option<bool>,

    /// Sync when the session ends
    #[arg(long, value_name = "BOOL")]
    pub sync_on_app_close: Option<bool>,

    /// Check for changes periodically
    #[arg(long, value_name = "BOOL")]
    pub periodic: Option<bool>,

    /// Minutes between periodic checks (1-60)
    #[arg(long, value_name = "MINUTES")]
    pub interval: Option<u32>,

    /// Record every synced file in the session log
    #[arg(long, value_name = "BOOL")]
    pub log_operations: Option<bool>,

    /// Back up the libraries before syncing
    #[arg(long, value_name = "BOOL")]
    pub backup: Option<bool>,

    /// Backups to keep (0-10, 0 disables backups)
    #[arg(long, value_name = "COUNT")]
    pub max_backups: Option<u32>,
}
