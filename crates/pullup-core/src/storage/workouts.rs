//! Persisted workout list blob.

use tracing::warn;

use super::Database;
use crate::error::StorageError;
use crate::model::Workout;

pub const WORKOUTS_KEY: &str = "workouts";

/// Raw read. `Ok(None)` means the blob was never written, which is how the
/// seed bootstrap tells "first run" apart from "user deleted everything".
pub fn load(db: &Database) -> Result<Option<Vec<Workout>>, StorageError> {
    db.blob_get(WORKOUTS_KEY)
}

pub fn save(db: &Database, workouts: &[Workout]) -> Result<(), StorageError> {
    db.blob_set(WORKOUTS_KEY, &workouts)
}

/// Best-effort read; failures degrade to an empty list.
pub fn load_or_default(db: &Database) -> Vec<Workout> {
    match load(db) {
        Ok(list) => list.unwrap_or_default(),
        Err(e) => {
            warn!("failed to load workouts blob: {e}");
            Vec::new()
        }
    }
}

/// Best-effort write; failures are logged and swallowed.
pub fn save_best_effort(db: &Database, workouts: &[Workout]) {
    if let Err(e) = save(db, workouts) {
        warn!("failed to save workouts blob: {e}");
    }
}
