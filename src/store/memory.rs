//! In-memory store, used by tests and `--mock` dry runs.

use std::collections::BTreeMap;

use super::{ConfigStore, GroupStack, StoredValue};
use crate::error::Result;

/// Volatile [`ConfigStore`] keyed by `(group path, key)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<(String, String), StoredValue>,
    groups: GroupStack,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an arbitrary raw value, bypassing `set`.
    pub fn insert_raw(&mut self, group: &str, key: &str, value: StoredValue) {
        self.values
            .insert((group.to_string(), key.to_string()), value);
    }

    /// Stored value of `key` under the slash-joined `group` path.
    pub fn value(&self, group: &str, key: &str) -> Option<&StoredValue> {
        self.values.get(&(group.to_string(), key.to_string()))
    }

    /// Integer view of a stored value.
    pub fn int(&self, group: &str, key: &str) -> Option<i64> {
        self.value(group, key).and_then(StoredValue::to_int)
    }

    /// All keys stored under `group`, sorted.
    pub fn keys(&self, group: &str) -> Vec<String> {
        self.values
            .keys()
            .filter(|(g, _)| g == group)
            .map(|(_, key)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of `set` calls since creation.
    pub const fn write_count(&self) -> usize {
        self.writes
    }

    /// Current group path; empty at the root.
    pub fn current_path(&self) -> String {
        self.groups.path()
    }
}

impl ConfigStore for MemoryStore {
    fn begin_group(&mut self, name: &str) {
        self.groups.push(name);
    }

    fn end_group(&mut self) {
        self.groups.pop();
    }

    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self.values.get(&(self.groups.path(), key.to_string())).cloned())
    }

    fn set(&mut self, key: &str, value: i64) -> Result<()> {
        self.writes += 1;
        self.values
            .insert((self.groups.path(), key.to_string()), StoredValue::Int(value));
        Ok(())
    }
}
