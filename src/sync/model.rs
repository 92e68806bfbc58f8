//! Resolved control model handed to a front end for rendering.

use serde::Serialize;

use crate::catalog::{Symbology, ValueKind};
use crate::control::ControlKind;
use crate::sanitize::PersistedKey;

/// Current value of one per-symbology setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingState {
    pub name: &'static str,
    pub key: PersistedKey,
    pub kind: ValueKind,
    pub value: i64,
}

/// A symbology with its enable flag and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbologyState {
    pub name: &'static str,
    #[serde(skip)]
    pub symbology: Symbology,
    pub key: PersistedKey,
    pub aggregate: bool,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<SettingState>,
}

/// A device control with its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub index: usize,
    pub name: String,
    /// Store key; `None` for controls that are never persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<PersistedKey>,
    #[serde(flatten)]
    pub kind: ControlKind,
    /// `None` for momentary actions.
    pub value: Option<i64>,
}

/// Consecutive controls sharing a group name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlGroup {
    pub name: String,
    pub controls: Vec<ControlState>,
}

/// Everything a front end needs to lay out the settings surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlModel {
    pub device: String,
    pub symbologies: Vec<SymbologyState>,
    pub groups: Vec<ControlGroup>,
}

impl ControlModel {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            symbologies: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Append a control, opening a new group when the group name changes.
    pub fn push_control(&mut self, group: &str, control: ControlState) {
        match self.groups.last_mut() {
            Some(last) if last.name == group => last.controls.push(control),
            _ => self.groups.push(ControlGroup {
                name: group.to_string(),
                controls: vec![control],
            }),
        }
    }

    /// Look up a control by display name or store key.
    pub fn control(&self, name: &str) -> Option<&ControlState> {
        self.controls().find(|control| {
            control.name == name || control.key.as_ref().is_some_and(|key| key.as_str() == name)
        })
    }

    pub fn symbology(&self, name: &str) -> Option<&SymbologyState> {
        self.symbologies
            .iter()
            .find(|state| state.name.eq_ignore_ascii_case(name))
    }

    pub fn controls(&self) -> impl Iterator<Item = &ControlState> {
        self.groups.iter().flat_map(|group| group.controls.iter())
    }

    pub fn control_count(&self) -> usize {
        self.groups.iter().map(|group| group.controls.len()).sum()
    }
}
