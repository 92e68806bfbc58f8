//! Persistent key/value settings storage.
//!
//! Backends implement [`ConfigStore`], a hierarchical store with
//! `begin_group`/`end_group` scoping. The synchronizer only talks to a
//! [`StoreAdapter`], which addresses keys as `(group, key)` pairs, never
//! fails on reads, and logs write failures instead of returning them.
//!
//! # Backends
//!
//! | Extension | Backend |
//! |-----------|---------|
//! | `.db`, `.sqlite`, `.sqlite3` | [`SqliteStore`] |
//! | anything else | [`TomlStore`] |
//!
//! Nothing is cached between calls: every adapter read goes to the backend.

mod db;
mod memory;
mod toml_file;

pub use db::SqliteStore;
pub use memory::MemoryStore;
pub use toml_file::TomlStore;

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::error::{Result, ScanError};

/// A value as found in the backing store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Int(i64),
    Bool(bool),
    Float(f64),
    Text(String),
    /// Any other shape, described for diagnostics.
    Other(String),
}

impl StoredValue {
    /// Integer view of the stored value; `None` when it has the wrong shape.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Bool(value) => Some(i64::from(*value)),
            Self::Float(_) | Self::Other(_) => None,
            Self::Text(text) => {
                let text = text.trim();
                match text {
                    "true" => Some(1),
                    "false" => Some(0),
                    _ => text.parse().ok(),
                }
            }
        }
    }
}

/// Hierarchical key/value persistence.
pub trait ConfigStore {
    /// Enter a nested group; keys are resolved relative to it.
    fn begin_group(&mut self, name: &str);

    /// Leave the innermost group. Unbalanced calls are ignored.
    fn end_group(&mut self);

    /// Raw value of `key` in the current group.
    fn get(&self, key: &str) -> Result<Option<StoredValue>>;

    /// Write `key` in the current group.
    fn set(&mut self, key: &str, value: i64) -> Result<()>;

    /// Make pending writes durable.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for Box<S> {
    fn begin_group(&mut self, name: &str) {
        (**self).begin_group(name);
    }

    fn end_group(&mut self) {
        (**self).end_group();
    }

    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: i64) -> Result<()> {
        (**self).set(key, value)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Stack of open group names shared by the backends.
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupStack {
    groups: Vec<String>,
}

impl GroupStack {
    pub(crate) fn push(&mut self, name: &str) {
        self.groups.push(name.to_string());
    }

    pub(crate) fn pop(&mut self) {
        if self.groups.pop().is_none() {
            warn!("end_group called without a matching begin_group");
        }
    }

    pub(crate) fn segments(&self) -> &[String] {
        &self.groups
    }

    /// Slash-joined path, empty at the root.
    pub(crate) fn path(&self) -> String {
        self.groups.join("/")
    }
}

/// `(group, key)` access over a [`ConfigStore`].
pub struct StoreAdapter<S> {
    store: S,
}

impl<S: ConfigStore> StoreAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored value of `key` in `group`, or `default` if absent or malformed.
    pub fn get(&mut self, group: &str, key: &str, default: i64) -> i64 {
        self.store.begin_group(group);
        let raw = self.store.get(key);
        self.store.end_group();

        match raw {
            Ok(Some(value)) => match value.to_int() {
                Some(value) => {
                    trace!(group, key, value, "Read stored value");
                    value
                }
                None => {
                    warn!(group, key, ?value, default, "Malformed stored value, using default");
                    default
                }
            },
            Ok(None) => {
                trace!(group, key, default, "No stored value, using default");
                default
            }
            Err(e) => {
                warn!(group, key, error = %e, default, "Store read failed, using default");
                default
            }
        }
    }

    /// Write `key` in `group`. Failures are logged, not returned.
    pub fn set(&mut self, group: &str, key: &str, value: i64) {
        self.store.begin_group(group);
        let result = self.store.set(key, value);
        self.store.end_group();

        match result {
            Ok(()) => trace!(group, key, value, "Stored value"),
            Err(e) => warn!(group, key, value, error = %e, "Store write failed"),
        }
    }

    /// Flush the backend; failures are logged.
    pub fn flush(&mut self) {
        if let Err(e) = self.store.flush() {
            warn!(error = %e, "Store flush failed");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Default settings file: `<config dir>/scanctl/scanctl.toml`.
pub fn default_store_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ScanError::Other("Could not determine configuration directory".to_string())
    })?;
    Ok(config_dir.join("scanctl").join("scanctl.toml"))
}

/// Open the backend matching the file extension of `path`.
pub fn open_store(path: &Path) -> Result<Box<dyn ConfigStore>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    debug!(path = %path.display(), ?extension, "Opening settings store");

    match extension.as_deref() {
        Some("db" | "sqlite" | "sqlite3") => Ok(Box::new(SqliteStore::open(path)?)),
        _ => Ok(Box::new(TomlStore::open(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_value_to_int() {
        assert_eq!(StoredValue::Int(4).to_int(), Some(4));
        assert_eq!(StoredValue::Bool(true).to_int(), Some(1));
        assert_eq!(StoredValue::Text(" 12 ".to_string()).to_int(), Some(12));
        assert_eq!(StoredValue::Text("false".to_string()).to_int(), Some(0));
        assert_eq!(StoredValue::Text("lots".to_string()).to_int(), None);
        assert_eq!(StoredValue::Float(1.5).to_int(), None);
    }

    #[test]
    fn test_adapter_default_when_absent() {
        let mut adapter = StoreAdapter::new(MemoryStore::new());
        assert_eq!(adapter.get("Camera", "Auto_Focus", 7), 7);
    }

    #[test]
    fn test_adapter_groups_namespace_keys() {
        let mut adapter = StoreAdapter::new(MemoryStore::new());
        adapter.set("Camera", "Gain", 3);
        adapter.set("Symbology", "Gain", 9);

        assert_eq!(adapter.get("Camera", "Gain", 0), 3);
        assert_eq!(adapter.get("Symbology", "Gain", 0), 9);
        assert_eq!(adapter.get("Other", "Gain", -1), -1);
    }

    #[test]
    fn test_adapter_malformed_value_uses_default() {
        let mut store = MemoryStore::new();
        store.insert_raw("Camera", "Gain", StoredValue::Text("loud".to_string()));
        let mut adapter = StoreAdapter::new(store);
        assert_eq!(adapter.get("Camera", "Gain", 5), 5);
    }

    #[test]
    fn test_adapter_leaves_root_group() {
        let mut adapter = StoreAdapter::new(MemoryStore::new());
        adapter.set("Camera", "Gain", 3);
        assert!(adapter.store().current_path().is_empty());
    }

    #[test]
    fn test_group_stack_unbalanced_pop() {
        let mut stack = GroupStack::default();
        stack.pop();
        stack.push("A");
        stack.push("B");
        assert_eq!(stack.path(), "A/B");
        stack.pop();
        assert_eq!(stack.segments(), ["A".to_string()]);
    }

    #[test]
    fn test_open_store_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut toml = open_store(&dir.path().join("s.toml")).unwrap();
        toml.set("k", 1).unwrap();
        let mut db = open_store(&dir.path().join("s.db")).unwrap();
        db.set("k", 2).unwrap();
        assert_eq!(db.get("k").unwrap(), Some(StoredValue::Int(2)));
    }
}
