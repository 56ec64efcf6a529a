//! Per-day workout completion store.
//!
//! Persisted as a single JSON blob mapping `YYYY-MM-DD` to the workouts
//! completed on that day. Entries accumulate without eviction. The
//! scheduler only consults this store on load and at day rollover; the
//! best-effort helpers treat any storage failure as "nothing recorded".

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::clock::day_key;
use crate::error::StorageError;
use crate::storage::Database;

pub const COMPLETIONS_KEY: &str = "completions";

/// `YYYY-MM-DD -> workout id -> completed`.
pub type CompletionMap = BTreeMap<String, BTreeMap<String, bool>>;

/// Result-returning boundary read.
pub fn load(db: &Database) -> Result<CompletionMap, StorageError> {
    Ok(db.blob_get(COMPLETIONS_KEY)?.unwrap_or_default())
}

/// Result-returning boundary write.
pub fn store(db: &Database, map: &CompletionMap) -> Result<(), StorageError> {
    db.blob_set(COMPLETIONS_KEY, map)
}

/// Best-effort lookup; storage failures read as "not completed".
pub fn is_completed(db: &Database, workout_id: &str, day: NaiveDate) -> bool {
    match load(db) {
        Ok(map) => map
            .get(&day_key(day))
            .and_then(|per_day| per_day.get(workout_id))
            .copied()
            .unwrap_or(false),
        Err(e) => {
            warn!("completion read failed, treating as not completed: {e}");
            false
        }
    }
}

/// Best-effort write; storage failures are logged and swallowed.
pub fn set_completed(db: &Database, workout_id: &str, day: NaiveDate, completed: bool) {
    let mut map = match load(db) {
        Ok(map) => map,
        Err(e) => {
            warn!("completion read failed, starting from empty map: {e}");
            CompletionMap::new()
        }
    };
    map.entry(day_key(day))
        .or_default()
        .insert(workout_id.to_string(), completed);
    if let Err(e) = store(db, &map) {
        warn!("completion write failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn set_then_query() {
        let db = Database::open_memory().unwrap();
        let today = date(2026, 3, 7);
        assert!(!is_completed(&db, "w1", today));
        set_completed(&db, "w1", today, true);
        assert!(is_completed(&db, "w1", today));
        assert!(!is_completed(&db, "w2", today));
    }

    #[test]
    fn completion_is_per_day() {
        let db = Database::open_memory().unwrap();
        let today = date(2026, 3, 7);
        set_completed(&db, "w1", today, true);
        // A new calendar day reads fresh, no reset call needed.
        assert!(!is_completed(&db, "w1", date(2026, 3, 8)));
        assert!(is_completed(&db, "w1", today));
    }

    #[test]
    fn unsetting_works() {
        let db = Database::open_memory().unwrap();
        let today = date(2026, 3, 7);
        set_completed(&db, "w1", today, true);
        set_completed(&db, "w1", today, false);
        assert!(!is_completed(&db, "w1", today));
    }

    #[test]
    fn corrupt_blob_reads_as_no_completions() {
        let db = Database::open_memory().unwrap();
        db.kv_set(COMPLETIONS_KEY, "not json").unwrap();
        assert!(!is_completed(&db, "w1", date(2026, 3, 7)));
        // Writing over the corrupt blob repairs it.
        set_completed(&db, "w1", date(2026, 3, 7), true);
        assert!(is_completed(&db, "w1", date(2026, 3, 7)));
    }

    #[test]
    fn history_accumulates_across_days() {
        let db = Database::open_memory().unwrap();
        set_completed(&db, "w1", date(2026, 3, 7), true);
        set_completed(&db, "w1", date(2026, 3, 8), true);
        let map = load(&db).unwrap();
        assert_eq!(map.len(), 2);
    }
}
