//! Persistent storage: a SQLite key/value table of JSON blobs plus a TOML
//! settings file, both under the app config directory.

mod config;
mod database;
pub mod workouts;

pub use config::{
    Config, ExerciseCategory, NotificationsConfig, ReminderConfig, StandupConfig, TimerConfig,
};
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/pullup-alert[-dev]/` based on PULLUP_ALERT_ENV.
///
/// Set PULLUP_ALERT_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PULLUP_ALERT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pullup-alert-dev")
    } else {
        base_dir.join("pullup-alert")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
