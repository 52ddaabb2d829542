//! Persistent settings store

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::SyncSettings;
use crate::error::Result;

/// Settings backed by a TOML file
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: SyncSettings,
}

impl SettingsStore {
    /// Open the store and load its file.
    ///
    /// A missing file is created with defaults. An unreadable, unparsable or
    /// invalid file is replaced in memory by defaults and left untouched on
    /// disk.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let mut store = Self {
            path: path.to_path_buf(),
            settings: SyncSettings::default(),
        };
        store.load();
        store
    }

    /// Store that never touched disk yet. Used before a config dir is known.
    #[must_use]
    pub fn in_memory(path: &Path, settings: SyncSettings) -> Self {
        Self {
            path: path.to_path_buf(),
            settings,
        }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload settings from disk, falling back to defaults
    pub fn load(&mut self) -> &SyncSettings {
        self.settings = if self.path.exists() {
            match Self::read(&self.path) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        "Invalid settings file, using defaults: {e:#}"
                    );
                    SyncSettings::default()
                }
            }
        } else {
            let defaults = SyncSettings::default();
            if let Err(e) = Self::write(&self.path, &defaults) {
                tracing::warn!(path = %self.path.display(), "Failed to write default settings: {e:#}");
            }
            defaults
        };

        &self.settings
    }

    /// Current settings
    #[must_use]
    pub const fn get(&self) -> &SyncSettings {
        &self.settings
    }

    /// Validate, persist and adopt new settings
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are out of range or cannot be saved.
    /// The current settings are unchanged on error.
    pub fn update(&mut self, settings: SyncSettings) -> Result<()> {
        settings.validate()?;
        Self::write(&self.path, &settings)?;

        tracing::info!(path = %self.path.display(), "Settings updated");
        self.settings = settings;
        Ok(())
    }

    /// Restore and persist defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults cannot be saved.
    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.update(SyncSettings::default())
    }

    fn read(path: &Path) -> Result<SyncSettings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings: SyncSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn write(path: &Path, settings: &SyncSettings) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_writes_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/auto_sync.toml");

        let store = SettingsStore::open(&path);

        assert_eq!(store.get(), &SyncSettings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_update_persists() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("auto_sync.toml");
        let mut store = SettingsStore::open(&path);

        let settings = SyncSettings {
            periodic_interval_minutes: 10,
            max_backups: 5,
            ..SyncSettings::default()
        };
        store.update(settings.clone()).unwrap();

        let reopened = SettingsStore::open(&path);
        assert_eq!(reopened.get(), &settings);
    }

    #[test]
    fn test_update_rejects_invalid_and_keeps_current() {
        let tmp = TempDir::new().unwrap();
        let mut store = SettingsStore::open(&tmp.path().join("auto_sync.toml"));

        let err = store
            .update(SyncSettings {
                periodic_interval_minutes: 0,
                ..SyncSettings::default()
            })
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::IntervalOutOfRange { value: 0, .. })
        ));
        assert_eq!(store.get().periodic_interval_minutes, 5);
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("auto_sync.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let store = SettingsStore::open(&path);

        assert_eq!(store.get(), &SyncSettings::default());
        // Broken file is left for the user to inspect
        assert_eq!(fs::read_to_string(&path).unwrap(), "this is = = not toml");
    }

    #[test]
    fn test_out_of_range_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("auto_sync.toml");
        fs::write(&path, "max_backups = 99\n").unwrap();

        let store = SettingsStore::open(&path);

        assert_eq!(store.get().max_backups, 3);
    }

    #[test]
    fn test_reset_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("auto_sync.toml");
        let mut store = SettingsStore::open(&path);
        store
            .update(SyncSettings {
                periodic_enabled: false,
                ..SyncSettings::default()
            })
            .unwrap();

        store.reset_to_defaults().unwrap();

        assert!(store.get().periodic_enabled);
        assert!(SettingsStore::open(&path).get().periodic_enabled);
    }
}
