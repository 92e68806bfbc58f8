//! TOML file store: one table per group.
//!
//! ```toml
//! [Symbology]
//! "Code-39.min-length" = 4
//!
//! [Camera]
//! Auto_Focus = 1
//! ```
//!
//! The whole document is held in memory and written back on
//! [`flush`](ConfigStore::flush) or when the store is dropped with unsaved
//! changes.

use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::{debug, instrument, warn};

use super::{ConfigStore, GroupStack, StoredValue};
use crate::error::{Result, ScanError};

/// [`ConfigStore`] backed by a TOML document on disk.
#[derive(Debug)]
pub struct TomlStore {
    path: PathBuf,
    document: Table,
    groups: GroupStack,
    dirty: bool,
}

impl TomlStore {
    /// Open `path`, starting empty if the file does not exist yet.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let document = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ScanError::StoreOpenFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            content.parse::<Table>().map_err(|e| {
                ScanError::ConfigParse(format!("{}: {e}", path.display()))
            })?
        } else {
            debug!("Settings file not found, starting empty");
            Table::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            document,
            groups: GroupStack::default(),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are writes not yet flushed to disk.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn current_table(&self) -> Option<&Table> {
        let mut table = &self.document;
        for segment in self.groups.segments() {
            table = table.get(segment)?.as_table()?;
        }
        Some(table)
    }

    fn current_table_mut(&mut self) -> Result<&mut Table> {
        let mut table = &mut self.document;
        for segment in self.groups.segments() {
            let entry = table
                .entry(segment.clone())
                .or_insert_with(|| Value::Table(Table::new()));
            table = entry.as_table_mut().ok_or_else(|| {
                ScanError::Store(format!("'{segment}' in {} is not a table", self.path.display()))
            })?;
        }
        Ok(table)
    }
}

impl ConfigStore for TomlStore {
    fn begin_group(&mut self, name: &str) {
        self.groups.push(name);
    }

    fn end_group(&mut self) {
        self.groups.pop();
    }

    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self
            .current_table()
            .and_then(|table| table.get(key))
            .map(stored_value))
    }

    fn set(&mut self, key: &str, value: i64) -> Result<()> {
        self.current_table_mut()?
            .insert(key.to_string(), Value::Integer(value));
        self.dirty = true;
        Ok(())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.document)
            .map_err(|e| ScanError::Store(format!("Failed to serialize settings: {e}")))?;
        fs::write(&self.path, content)?;
        self.dirty = false;
        debug!("Settings file written");
        Ok(())
    }
}

impl Drop for TomlStore {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!(path = %self.path.display(), error = %e, "Failed to write settings on close");
        }
    }
}

fn stored_value(value: &Value) -> StoredValue {
    match value {
        Value::Integer(i) => StoredValue::Int(*i),
        Value::Boolean(b) => StoredValue::Bool(*b),
        Value::Float(f) => StoredValue::Float(*f),
        Value::String(s) => StoredValue::Text(s.clone()),
        other => StoredValue::Other(other.type_str().to_string()),
    }
}
