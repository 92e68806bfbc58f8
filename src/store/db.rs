//! SQLite settings store.
//!
//! Each write is committed immediately, so there is nothing to flush.

use std::path::Path;

use chrono::Utc;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument};

use super::{ConfigStore, GroupStack, StoredValue};
use crate::error::{Result, ScanError};

/// SQLite schema for persisted settings.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS settings (
    group_path TEXT NOT NULL,
    key TEXT NOT NULL,
    value,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (group_path, key)
);
";

/// [`ConfigStore`] backed by a SQLite database.
pub struct SqliteStore {
    conn: Connection,
    groups: GroupStack,
}

impl SqliteStore {
    /// Opens or creates a database at the given path.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ScanError::StoreOpenFailed {
                path: path.display().to_string(),
                reason: format!("cannot create {}: {e}", parent.display()),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| ScanError::StoreOpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let store = Self::with_connection(conn)?;
        info!(path = %path.display(), "Settings database ready");
        Ok(store)
    }

    /// Creates an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            ScanError::Store(format!("Failed to create in-memory database: {e}"))
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| ScanError::Store(format!("Failed to initialize schema: {e}")))?;
        Ok(Self {
            conn,
            groups: GroupStack::default(),
        })
    }

    /// RFC 3339 time of the last write to `key` under `group`.
    pub fn updated_at(&self, group: &str, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM settings WHERE group_path = ?1 AND key = ?2",
                params![group, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ScanError::Store(format!("Failed to read timestamp: {e}")))
    }

    /// Number of stored settings across all groups.
    pub fn count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .map_err(|e| ScanError::Store(format!("Failed to count settings: {e}")))
    }
}

impl ConfigStore for SqliteStore {
    fn begin_group(&mut self, name: &str) {
        self.groups.push(name);
    }

    fn end_group(&mut self) {
        self.groups.pop();
    }

    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE group_path = ?1 AND key = ?2",
                params![self.groups.path(), key],
                |row| row.get_ref(0).map(stored_value),
            )
            .optional()
            .map_err(|e| ScanError::Store(format!("Failed to read '{key}': {e}")))?;
        Ok(value.flatten())
    }

    fn set(&mut self, key: &str, value: i64) -> Result<()> {
        let group = self.groups.path();
        self.conn
            .execute(
                "INSERT INTO settings (group_path, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(group_path, key)
                 DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![group, key, value, Utc::now().to_rfc3339()],
            )
            .map_err(|e| ScanError::Store(format!("Failed to write '{key}': {e}")))?;
        debug!(%group, key, value, "Setting written");
        Ok(())
    }
}

fn stored_value(value: ValueRef<'_>) -> Option<StoredValue> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(StoredValue::Int(i)),
        ValueRef::Real(f) => Some(StoredValue::Float(f)),
        ValueRef::Text(bytes) => Some(StoredValue::Text(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        ValueRef::Blob(bytes) => Some(StoredValue::Other(format!("blob of {} bytes", bytes.len()))),
    }
}
