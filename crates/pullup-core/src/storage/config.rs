//! TOML-based application settings.
//!
//! Stores user preferences:
//! - Reminder cadence for due workouts
//! - Notification suppression policy
//! - Default rest-timer duration
//! - Stand-up reminder ranges
//! - Exercise categories with their sets/reps variables
//!
//! Configuration is stored at `~/.config/pullup-alert/config.toml`.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::template::VarTable;

/// Reminder ticker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Minutes between repeat reminders for a due, uncompleted workout.
    #[serde(default = "default_reminder_interval")]
    pub interval_minutes: u32,
}

/// Rest timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Applied to seed workouts that define no timers of their own.
    #[serde(default = "default_timer_duration")]
    pub default_duration_secs: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Suppress desktop-style notifications while the UI is visible.
    /// Applies uniformly to workout, timer and stand-up alerts.
    #[serde(default = "default_true")]
    pub suppress_when_visible: bool,
}

/// Stand-up reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandupConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_sit_min")]
    pub sit_min_minutes: u32,
    #[serde(default = "default_sit_max")]
    pub sit_max_minutes: u32,
    #[serde(default = "default_stand_min")]
    pub stand_min_minutes: u32,
    #[serde(default = "default_stand_max")]
    pub stand_max_minutes: u32,
}

/// A named exercise category providing sets/reps template variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCategory {
    pub id: String,
    pub name: String,
    /// Short alphanumeric variable prefix, e.g. "PULL" -> PULLSETS, PULLREPS.
    pub prefix: String,
    pub sets: i64,
    pub reps: i64,
    /// Workouts referencing an inactive category never alert.
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pullup-alert/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub standup: StandupConfig,
    #[serde(default = "default_categories")]
    pub categories: Vec<ExerciseCategory>,
}

// Default functions
fn default_reminder_interval() -> u32 {
    30
}
fn default_timer_duration() -> u32 {
    75
}
fn default_true() -> bool {
    true
}
fn default_sit_min() -> u32 {
    25
}
fn default_sit_max() -> u32 {
    35
}
fn default_stand_min() -> u32 {
    5
}
fn default_stand_max() -> u32 {
    10
}
fn default_categories() -> Vec<ExerciseCategory> {
    vec![ExerciseCategory {
        id: "pull".to_string(),
        name: "Pullups".to_string(),
        prefix: "PULL".to_string(),
        sets: 2,
        reps: 3,
        active: true,
    }]
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_reminder_interval(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_timer_duration(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suppress_when_visible: true,
        }
    }
}

impl Default for StandupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sit_min_minutes: default_sit_min(),
            sit_max_minutes: default_sit_max(),
            stand_min_minutes: default_stand_min(),
            stand_max_minutes: default_stand_max(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminder: ReminderConfig::default(),
            timer: TimerConfig::default(),
            notifications: NotificationsConfig::default(),
            standup: StandupConfig::default(),
            categories: default_categories(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::DataDir(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, falling back to defaults on any failure.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("falling back to default config: {e}");
                Self::default()
            }
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = get_by_path(&json, key)?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// into the existing value's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        set_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        self.save()
    }

    /// Template variable table: `{PREFIX}SETS`/`{PREFIX}REPS` per category,
    /// plus the legacy unprefixed alias for the first configured category.
    pub fn var_table(&self) -> VarTable {
        let mut vars = VarTable::new();
        for category in &self.categories {
            vars.insert(&format!("{}SETS", category.prefix), category.sets as f64);
            vars.insert(&format!("{}REPS", category.prefix), category.reps as f64);
        }
        if let Some(first) = self.categories.first() {
            vars.insert("SETS", first.sets as f64);
            vars.insert("REPS", first.reps as f64);
        }
        vars
    }

    pub fn inactive_categories(&self) -> HashSet<String> {
        self.categories
            .iter()
            .filter(|c| !c.active)
            .map(|c| c.id.clone())
            .collect()
    }
}

fn get_by_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
    use serde_json::Value;

    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };
    let mut current = root;
    if let Some(parents) = parents {
        for part in parents.split('.') {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
    }
    let obj = current.as_object_mut().ok_or_else(unknown)?;
    let existing = obj.get(leaf).ok_or_else(unknown)?;

    let new_value = match existing {
        Value::Bool(_) => Value::Bool(
            value
                .parse::<bool>()
                .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
        ),
        Value::Number(_) => {
            if let Ok(n) = value.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(n) = value.parse::<f64>() {
                serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
            } else {
                return Err(invalid(format!("cannot parse '{value}' as number")));
            }
        }
        Value::Object(_) | Value::Array(_) => {
            serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
        }
        _ => Value::String(value.to_string()),
    };

    obj.insert(leaf.to_string(), new_value);
    Ok(())
}
