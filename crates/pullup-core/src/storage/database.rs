//! SQLite-backed key/value store of JSON blobs.
//!
//! The whole persisted state of the app is a handful of JSON documents
//! under well-known keys (`workouts`, `completions`, `standup_state`).
//! Blob keys are opaque to this layer.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::StorageError;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pullup-alert/pullup.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(data_dir()?.join("pullup.db"))
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Typed JSON blob read. Corrupt JSON is reported, never panics.
    pub fn blob_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv_get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                StorageError::CorruptBlob {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }),
        }
    }

    pub fn blob_set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::CorruptBlob {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store_round_trip() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn typed_blobs_round_trip() {
        let db = Database::open_memory().unwrap();
        db.blob_set("nums", &vec![1u32, 2, 3]).unwrap();
        let back: Option<Vec<u32>> = db.blob_get("nums").unwrap();
        assert_eq!(back.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn corrupt_blob_is_an_error_not_a_panic() {
        let db = Database::open_memory().unwrap();
        db.kv_set("bad", "{not json").unwrap();
        let result: Result<Option<Vec<u32>>, _> = db.blob_get("bad");
        assert!(matches!(result, Err(StorageError::CorruptBlob { .. })));
    }
}
