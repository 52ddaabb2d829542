use asselect_core::config::SyncSettings;

use super::AppContext;
use crate::cli::{SettingsAction, SettingsArgs};

pub struct Settings;

impl Settings {
    pub fn execute(ctx: &AppContext, action: Option<&SettingsAction>) -> anyhow::Result<()> {
        let mut store = ctx.settings_store();

        match action {
            None | Some(SettingsAction::Show) => {}
            Some(SettingsAction::Set(args)) => {
                let updated = apply(store.get().clone(), args);
                store.update(updated)?;
                println!("✓ Settings saved");
            }
            Some(SettingsAction::Reset) => {
                store.reset_to_defaults()?;
                println!("✓ Settings reset to defaults");
            }
        }

        if ctx.verbose {
            println!("Settings file: {}", store.path().display());
        }
        print_settings(store.get());
        Ok(())
    }
}

fn apply(mut settings: SyncSettings, args: &SettingsArgs) -> SyncSettings {
    if let Some(value) = args.sync_on_studio_close {
        settings.sync_on_studio_close = value;
    }
    if let Some(value) = args.sync_on_app_close {
        settings.sync_on_app_close = value;
    }
    if let Some(value) = args.periodic {
        settings.periodic_enabled = value;
    }
    if let Some(value) = args.interval {
        settings.periodic_interval_minutes = value;
    }
    if let Some(value) = args.log_operations {
        settings.log_operations = value;
    }
    if let Some(value) = args.backup {
        settings.backup_before_sync = value;
    }
    if let Some(value) = args.max_backups {
        settings.max_backups = value;
    }
    settings
}

fn print_settings(settings: &SyncSettings) {
    println!("sync_on_studio_close      = {}", settings.sync_on_studio_close);
    println!("sync_on_app_close         = {}", settings.sync_on_app_close);
    println!("periodic_enabled          = {}", settings.periodic_enabled);
    println!("periodic_interval_minutes = {}", settings.periodic_interval_minutes);
    println!("log_operations            = {}", settings.log_operations);
    println!("backup_before_sync        = {}", settings.backup_before_sync);
    println!("max_backups               = {}", settings.max_backups);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_touches_given_fields() {
        let args = SettingsArgs {
            interval: Some(15),
            backup: Some(false),
            ..SettingsArgs::default()
        };

        let settings = apply(SyncSettings::default(), &args);

        assert_eq!(settings.periodic_interval_minutes, 15);
        assert!(!settings.backup_before_sync);
        assert_eq!(settings.max_backups, SyncSettings::default().max_backups);
        assert!(settings.sync_on_studio_close);
    }

    #[test]
    fn test_apply_without_args_is_identity() {
        let settings = apply(SyncSettings::default(), &SettingsArgs::default());
        assert_eq!(settings, SyncSettings::default());
    }
}
