//! Per-key outcomes of a sync pass.

use serde::Serialize;

use crate::sanitize::PersistedKey;

/// Which way values flowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Store to device.
    Load,
    /// Device to store.
    Save,
    /// A single user change, applied to the device and persisted.
    Edit,
}

/// What happened to one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Value written to the device or decoder.
    Applied,
    /// Value written to the store.
    Persisted,
    /// Value could not be read; nothing was touched.
    Skipped,
    /// The device or decoder refused the value.
    Rejected,
}

/// One key visited by a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEntry {
    pub group: &'static str,
    pub key: PersistedKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SyncEntry {
    pub fn applied(group: &'static str, key: PersistedKey, value: i64) -> Self {
        Self {
            group,
            key,
            value: Some(value),
            outcome: Outcome::Applied,
            reason: None,
        }
    }

    pub fn persisted(group: &'static str, key: PersistedKey, value: i64) -> Self {
        Self {
            group,
            key,
            value: Some(value),
            outcome: Outcome::Persisted,
            reason: None,
        }
    }

    pub fn skipped(group: &'static str, key: PersistedKey, reason: impl Into<String>) -> Self {
        Self {
            group,
            key,
            value: None,
            outcome: Outcome::Skipped,
            reason: Some(reason.into()),
        }
    }

    pub fn rejected(
        group: &'static str,
        key: PersistedKey,
        value: i64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            group,
            key,
            value: Some(value),
            outcome: Outcome::Rejected,
            reason: Some(reason.into()),
        }
    }
}

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub applied: usize,
    pub persisted: usize,
    pub skipped: usize,
    pub rejected: usize,
}

/// Everything one load, save, or edit batch did, in traversal order.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub direction: Direction,
    pub device: String,
    pub entries: Vec<SyncEntry>,
}

impl SyncReport {
    pub fn new(direction: Direction, device: impl Into<String>) -> Self {
        Self {
            direction,
            device: device.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: SyncEntry) {
        self.entries.push(entry);
    }

    /// First entry for `key` in `group`.
    pub fn entry(&self, group: &str, key: &str) -> Option<&SyncEntry> {
        self.entries
            .iter()
            .find(|entry| entry.group == group && entry.key.as_str() == key)
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == outcome)
            .count()
    }

    pub fn summary(&self) -> SyncSummary {
        self.entries
            .iter()
            .fold(SyncSummary::default(), |mut summary, entry| {
                match entry.outcome {
                    Outcome::Applied => summary.applied += 1,
                    Outcome::Persisted => summary.persisted += 1,
                    Outcome::Skipped => summary.skipped += 1,
                    Outcome::Rejected => summary.rejected += 1,
                }
                summary
            })
    }

    /// True when nothing was refused by the device.
    pub fn is_clean(&self) -> bool {
        self.count(Outcome::Rejected) == 0
    }
}
