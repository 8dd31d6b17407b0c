//! SQLite key/value backend

use crate::error::StoreError;
use ekmyth_domain::{now_millis, KvBackend};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-based implementation of KvBackend
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteBackend instance.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open (or create) the database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ekmyth_store::SqliteBackend;
    ///
    /// let backend = SqliteBackend::new("ekmyth.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let backend = Self { conn };
        backend.initialize_schema()?;
        Ok(backend)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Epoch millis of the last write to `key`
    pub fn updated_at(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let updated: Option<i64> = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated.map(|t| t as u64))
    }
}

impl KvBackend for SqliteBackend {
    type Error = StoreError;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now_millis() as i64],
        )?;
        Ok(())
    }
}
