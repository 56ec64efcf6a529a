//! One-time seed import.
//!
//! A first run with no persisted workouts imports `workouts.json`, a
//! hand-maintained seed document: a list of workout definitions plus
//! optional top-level `sets`/`repeats` defaults that migrate into the
//! first configured exercise category. Once the
//! workouts blob exists the importer never runs again (unless forced).
//! Any failure degrades to an empty workout list; nothing is persisted,
//! so the next run simply retries.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clock::DayCode;
use crate::model::{TimerDef, Workout};
use crate::storage::{workouts, Config, Database};

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    /// Legacy top-level defaults, applied to the first category.
    #[serde(default)]
    pub sets: Option<i64>,
    #[serde(default)]
    pub repeats: Option<i64>,
    #[serde(default)]
    pub workouts: Vec<SeedWorkout>,
}

#[derive(Debug, Deserialize)]
pub struct SeedWorkout {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub days: Vec<DayCode>,
    #[serde(default)]
    pub repeating: bool,
    #[serde(default)]
    pub repeat_interval_minutes: Option<u32>,
    #[serde(default)]
    pub exercises: Vec<String>,
    #[serde(default)]
    pub timers: Vec<SeedTimer>,
}

#[derive(Debug, Deserialize)]
pub struct SeedTimer {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub duration_secs: u32,
    #[serde(default)]
    pub repeating: bool,
}

pub fn parse(json: &str) -> Result<SeedFile, serde_json::Error> {
    serde_json::from_str(json)
}

/// Outcome of [`bootstrap`]. When `imported` is set the config may carry
/// migrated category defaults the caller should persist.
pub struct Bootstrap {
    pub workouts: Vec<Workout>,
    pub imported: bool,
}

impl Bootstrap {
    fn untouched(workouts: Vec<Workout>) -> Self {
        Self {
            workouts,
            imported: false,
        }
    }
}

/// Import `path` unless a workouts blob already exists (or `force` is
/// set). Returns the resulting workout list.
pub fn bootstrap(db: &Database, config: &mut Config, path: &Path, force: bool) -> Bootstrap {
    match workouts::load(db) {
        Ok(Some(existing)) if !force => return Bootstrap::untouched(existing),
        Ok(_) => {}
        Err(e) => {
            warn!("workouts blob unreadable, attempting seed import: {e}");
        }
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no seed file at {}, starting empty", path.display());
            return Bootstrap::untouched(Vec::new());
        }
        Err(e) => {
            warn!("seed file {} not readable: {e}", path.display());
            return Bootstrap::untouched(Vec::new());
        }
    };
    let seed = match parse(&raw) {
        Ok(seed) => seed,
        Err(e) => {
            warn!("seed file {} is not valid JSON: {e}", path.display());
            return Bootstrap::untouched(Vec::new());
        }
    };
    Bootstrap {
        workouts: import(db, config, seed),
        imported: true,
    }
}

/// Migrate parsed seed data into the stores. The updated config is not
/// saved here; callers persist it when [`Bootstrap::imported`] is set.
pub fn import(db: &Database, config: &mut Config, seed: SeedFile) -> Vec<Workout> {
    if let Some(first) = config.categories.first_mut() {
        if let Some(sets) = seed.sets {
            first.sets = sets;
        }
        if let Some(reps) = seed.repeats {
            first.reps = reps;
        }
    }
    let default_secs = config.timer.default_duration_secs.max(1);
    let mut out = Vec::new();
    for entry in seed.workouts {
        let workout = into_workout(entry, default_secs);
        match workout.validate() {
            Ok(()) => out.push(workout),
            Err(e) => warn!("skipping seed workout '{}': {e}", workout.title),
        }
    }
    workouts::save_best_effort(db, &out);
    out
}

fn into_workout(seed: SeedWorkout, default_timer_secs: u32) -> Workout {
    let timers = if seed.timers.is_empty() {
        // Fallback: one looping rest countdown.
        vec![TimerDef {
            id: Uuid::new_v4().to_string(),
            name: "Rest".to_string(),
            duration_secs: default_timer_secs,
            repeating: true,
        }]
    } else {
        seed.timers
            .into_iter()
            .map(|t| TimerDef {
                id: t.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                name: t.name,
                duration_secs: t.duration_secs,
                repeating: t.repeating,
            })
            .collect()
    };
    Workout {
        id: seed.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        title: seed.title,
        category: seed.category,
        time: seed.time,
        days: seed.days,
        repeating: seed.repeating,
        repeat_interval_minutes: seed.repeat_interval_minutes.unwrap_or(60),
        exercises: seed.exercises,
        timers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SEED: &str = indoc! {r#"
        {
          "sets": 4,
          "repeats": 8,
          "workouts": [
            {
              "id": "morning",
              "title": "Morning pullups",
              "time": "07:00",
              "days": ["Mon", "Wed", "Fri"],
              "exercises": ["[SETS] x [REPS] wide grip"]
            },
            {
              "title": "Micro sets",
              "repeating": true,
              "repeat_interval_minutes": 90,
              "timers": [
                { "name": "Hang", "duration_secs": 30 }
              ]
            },
            {
              "title": "Broken entry",
              "time": "25:99"
            }
          ]
        }
    "#};

    #[test]
    fn imports_workouts_and_category_defaults() {
        let db = Database::open_memory().unwrap();
        let mut config = Config::default();
        let seed = parse(SEED).unwrap();
        let imported = import(&db, &mut config, seed);

        // The invalid entry is skipped.
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].id, "morning");
        assert_eq!(imported[0].days.len(), 3);
        assert!(imported[1].repeating);
        assert_eq!(imported[1].repeat_interval_minutes, 90);
        assert!(!imported[1].id.is_empty());

        // Legacy defaults land on the first category.
        assert_eq!(config.categories[0].sets, 4);
        assert_eq!(config.categories[0].reps, 8);

        // The blob is persisted.
        let stored = workouts::load(&db).unwrap().unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn workouts_without_timers_get_the_default_rest_timer() {
        let db = Database::open_memory().unwrap();
        let mut config = Config::default();
        let imported = import(&db, &mut config, parse(SEED).unwrap());

        let timers = &imported[0].timers;
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].name, "Rest");
        assert_eq!(timers[0].duration_secs, 75);
        assert!(timers[0].repeating);

        // Explicit timers are kept as declared.
        assert_eq!(imported[1].timers[0].name, "Hang");
        assert_eq!(imported[1].timers[0].duration_secs, 30);
        assert!(!imported[1].timers[0].repeating);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(parse("{\"workouts\": [}").is_err());
        assert!(parse("").is_err());
    }
}
