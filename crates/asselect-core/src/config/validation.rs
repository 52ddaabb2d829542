//! Settings validation

use super::types::SyncSettings;
use crate::error::SettingsError;

/// Settings validator
pub struct SettingsValidator;

impl SettingsValidator {
    /// Smallest periodic interval in minutes
    pub const MIN_INTERVAL_MINUTES: u32 = 1;
    /// Largest periodic interval in minutes
    pub const MAX_INTERVAL_MINUTES: u32 = 60;
    /// Largest backup retention count
    pub const MAX_BACKUPS: u32 = 10;

    /// Validate settings as a whole. Out-of-range values are rejected, never clamped.
    ///
    /// # Errors
    ///
    /// Returns the first field found outside its range.
    pub const fn validate(settings: &SyncSettings) -> Result<(), SettingsError> {
        let interval = settings.periodic_interval_minutes;
        if interval < Self::MIN_INTERVAL_MINUTES || interval > Self::MAX_INTERVAL_MINUTES {
            return Err(SettingsError::IntervalOutOfRange {
                value: interval,
                min: Self::MIN_INTERVAL_MINUTES,
                max: Self::MAX_INTERVAL_MINUTES,
            });
        }

        if settings.max_backups > Self::MAX_BACKUPS {
            return Err(SettingsError::MaxBackupsOutOfRange {
                value: settings.max_backups,
                max: Self::MAX_BACKUPS,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_interval_bounds() {
        for minutes in [1, 30, 60] {
            let settings = SyncSettings {
                periodic_interval_minutes: minutes,
                ..SyncSettings::default()
            };
            assert!(SettingsValidator::validate(&settings).is_ok(), "{minutes}");
        }

        for minutes in [0, 61] {
            let settings = SyncSettings {
                periodic_interval_minutes: minutes,
                ..SyncSettings::default()
            };
            assert_eq!(
                SettingsValidator::validate(&settings),
                Err(SettingsError::IntervalOutOfRange {
                    value: minutes,
                    min: 1,
                    max: 60
                })
            );
        }
    }

    #[test]
    fn test_validate_max_backups() {
        let settings = SyncSettings {
            max_backups: 11,
            ..SyncSettings::default()
        };

        let err = SettingsValidator::validate(&settings).unwrap_err();
        assert!(err.to_string().contains("between 0 and 10"));

        let settings = SyncSettings {
            max_backups: 0,
            ..SyncSettings::default()
        };
        assert!(SettingsValidator::validate(&settings).is_ok());
    }
}
