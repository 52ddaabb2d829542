//! Application configuration: studios and project root

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::studio::{AutomationStudio, StudioVersion};

/// What the user has configured across runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Project root holding `Logical/` and `Physical/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Version picked most recently
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_selected_studio: Option<StudioVersion>,

    /// Installed studios
    pub studios: Vec<AutomationStudio>,
}

impl AppConfig {
    /// Load from a TOML file. A missing file yields an empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save to a TOML file, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Add a studio, replacing any existing entry for the same version
    pub fn upsert_studio(&mut self, studio: AutomationStudio) {
        match self.studios.iter_mut().find(|s| s.version == studio.version) {
            Some(existing) => *existing = studio,
            None => self.studios.push(studio),
        }
    }

    /// Studio configured for a version
    #[must_use]
    pub fn find_studio(&self, version: StudioVersion) -> Option<&AutomationStudio> {
        self.studios.iter().find(|s| s.version == version)
    }
}
