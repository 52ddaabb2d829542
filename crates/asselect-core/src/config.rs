//! Settings and application configuration persistence
//!
//! This module handles:
//! - Auto-sync settings with range validation
//! - TOML persistence with fall-back to defaults
//! - Config directory discovery with an explicit override
//! - The studio registry and project root chosen by the user

mod app;
mod discovery;
mod store;
mod types;
mod validation;


pub use app::AppConfig;
pub use discovery::{ConfigDiscovery, ConfigPaths};
pub use store::SettingsStore;
pub use types::SyncSettings;
pub use validation::SettingsValidator;
