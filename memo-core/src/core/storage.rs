//! Key-value backends for the persistence adapter.
//!
//! [`Storage`] keeps records in a single SQLite table and is the durable
//! default. [`MemoryStore`] keeps them in a map and is used for ephemeral
//! notebooks and tests.

use crate::{MemoError, Result};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// A string-keyed store of opaque string records.
pub trait KeyValueStore {
    /// Returns the record stored under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces every listed record as one unit: either all writes land or
    /// none do.
    fn put_all(&mut self, entries: &[(&str, String)]) -> Result<()>;
}

/// SQLite-backed key-value store.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (creating if necessary) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Database`] if the file cannot be opened or is not
    /// a SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put_all(&mut self, entries: &[(&str, String)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// In-memory key-value store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record directly, bypassing the persistence adapter.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Makes every subsequent write fail; used to exercise rollback paths.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_all(&mut self, entries: &[(&str, String)]) -> Result<()> {
        if self.fail_writes {
            return Err(MemoError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "storage is read-only",
            )));
        }
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_create_storage() {
        let temp = NamedTempFile::new().unwrap();
        let storage = Storage::open(temp.path()).unwrap();

        let tables: Vec<String> = storage
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert!(tables.contains(&"kv".to_string()));
    }

    #[test]
    fn test_put_all_overwrites_and_persists_across_open() {
        let temp = NamedTempFile::new().unwrap();
        {
            let mut storage = Storage::open(temp.path()).unwrap();
            storage
                .put_all(&[("notes", "{}".to_string()), ("folders", "{}".to_string())])
                .unwrap();
            storage.put_all(&[("notes", "{\"a\":1}".to_string())]).unwrap();
        }

        let storage = Storage::open(temp.path()).unwrap();
        assert_eq!(storage.get("notes").unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(storage.get("folders").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.get("missing").unwrap(), None);
    }

    #[test]
    fn test_open_invalid_database() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "not a database, just some text that is long enough").unwrap();

        let result = Storage::open(temp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_memory_store_failing_writes_change_nothing() {
        let mut store = MemoryStore::new().with_entry("notes", "{}");
        store.set_fail_writes(true);
        assert!(store.put_all(&[("notes", "changed".to_string())]).is_err());
        assert_eq!(store.get("notes").unwrap().as_deref(), Some("{}"));
    }
}
