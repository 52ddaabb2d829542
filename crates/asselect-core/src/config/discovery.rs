//! Config directory discovery

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::Result;

/// Locations of every file the application persists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Directory holding everything below
    pub dir: PathBuf,
    /// Auto-sync settings file
    pub settings_file: PathBuf,
    /// Studio registry and project root
    pub app_file: PathBuf,
    /// Session log directory
    pub log_dir: PathBuf,
}

impl ConfigPaths {
    /// Lay out the files inside a config directory
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            settings_file: dir.join("auto_sync.toml"),
            app_file: dir.join("config.toml"),
            log_dir: dir.join("logs"),
        }
    }
}

/// Config directory discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Application directory name under the platform config dir
    pub const APP_DIR: &'static str = "asselect";

    /// Resolve config paths, preferring an explicit directory
    ///
    /// # Errors
    ///
    /// Returns an error if no override is given and the platform has no
    /// config directory.
    pub fn discover(override_dir: Option<&Path>) -> Result<ConfigPaths> {
        if let Some(dir) = override_dir {
            return Ok(ConfigPaths::in_dir(dir));
        }

        let base = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(ConfigPaths::in_dir(&base.join(Self::APP_DIR)))
    }
}
