//! SQLite-backed key-value medium.
//!
//! Momentum persists a handful of JSON values under fixed string keys; the
//! database holds a single `kv` table and nothing else.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KvStore};
use crate::error::{CoreError, DatabaseError};

/// SQLite database holding the persisted key-value pairs.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open `file_name` inside the data directory.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open(file_name: &str) -> Result<Self, CoreError> {
        let path = data_dir()?.join(file_name);
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Set several values in one transaction. On failure nothing is written.
    pub fn kv_set_many(&mut self, entries: &[(&str, String)]) -> Result<(), rusqlite::Error> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)")?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()
    }

    /// Delete every key. Returns the number of rows removed.
    pub fn kv_clear(&self) -> Result<usize, rusqlite::Error> {
        self.conn.execute("DELETE FROM kv", [])
    }
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.kv_get(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DatabaseError> {
        Ok(self.kv_set(key, value)?)
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), DatabaseError> {
        Ok(self.kv_set_many(entries)?)
    }

    fn clear(&mut self) -> Result<(), DatabaseError> {
        let removed = self.kv_clear()?;
        tracing::debug!(removed, "cleared kv store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "world").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "world");
    }

    #[test]
    fn clear_removes_everything() {
        let mut db = Database::open_memory().unwrap();
        db.set("username", "\"ada\"").unwrap();
        db.set("index", "1").unwrap();
        db.clear().unwrap();
        assert!(db.get("username").unwrap().is_none());
        assert!(db.get("index").unwrap().is_none());
    }

    #[test]
    fn set_many_is_all_or_nothing() {
        let mut db = Database::open_memory().unwrap();
        db.set("index", "0").unwrap();
        db.conn()
            .execute_batch(
                "CREATE TRIGGER refuse_streak BEFORE INSERT ON kv
                 WHEN NEW.key = 'momentumStreak'
                 BEGIN SELECT RAISE(ABORT, 'streak write refused'); END;",
            )
            .unwrap();

        let entries = [
            ("index", "3".to_string()),
            ("momentumStreak", "1".to_string()),
        ];
        assert!(db.set_many(&entries).is_err());
        assert_eq!(db.get("index").unwrap().as_deref(), Some("0"));
        assert!(db.get("momentumStreak").unwrap().is_none());

        db.set_many(&entries[..1]).unwrap();
        assert_eq!(db.get("index").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("momentum.db");

        {
            let mut db = Database::open_at(&path).unwrap();
            db.set("momentumStreak", "7").unwrap();
        }

        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("momentumStreak").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn open_at_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no").join("such").join("dir.db");
        let err = Database::open_at(&path).err().unwrap();
        assert!(matches!(err, DatabaseError::OpenFailed { .. }));
    }
}
