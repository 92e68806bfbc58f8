//! Two-way synchronization between a scanner and the settings store.
//!
//! Load and save walk the same sequence so both compute identical keys:
//!
//! 1. every symbology's enable flag (`Symbology` group), followed by its
//!    per-symbology settings unless it is an aggregate
//! 2. every persistent device control (`Camera` group)
//!
//! A value the device cannot read or write is skipped and recorded in the
//! [`SyncReport`]; no pass ever aborts part way.

mod model;
mod report;
mod session;

pub use model::{ControlGroup, ControlModel, ControlState, SettingState, SymbologyState};
pub use report::{Direction, Outcome, SyncEntry, SyncReport, SyncSummary};
pub use session::Session;

use tracing::{debug, info, instrument, warn};

use crate::catalog::{Catalog, DecoderSetting, SettingEntry, Symbology, SymbologyEntry};
use crate::control::{ControlDescriptor, ControlKind, controls};
use crate::device::DeviceOperations;
use crate::error::{Result, ScanError};
use crate::sanitize::{PersistedKey, control_key, enable_key, setting_key};
use crate::store::{ConfigStore, StoreAdapter};

/// Store group for symbology flags and settings.
pub const SYMBOLOGY_GROUP: &str = "Symbology";

/// Store group for device controls.
pub const CAMERA_GROUP: &str = "Camera";

/// A single user change, identified explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEdit {
    SymbologyEnabled {
        symbology: Symbology,
        enabled: bool,
    },
    SymbologySetting {
        symbology: Symbology,
        setting: DecoderSetting,
        value: i64,
    },
    /// A device control, by display name or store key.
    Control { name: String, value: i64 },
}

/// Decoder-side item visited by a pass.
struct CatalogItem {
    symbology: Symbology,
    setting: DecoderSetting,
    key: PersistedKey,
}

/// Runs load, save, and edit passes over an injected catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronizer {
    catalog: Catalog,
}

impl Synchronizer {
    pub const fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Push stored values into the device, defaulting to what it reports now.
    #[instrument(skip_all, fields(device = device.name()))]
    pub fn load<D, S>(&self, device: &D, store: &mut StoreAdapter<S>) -> SyncReport
    where
        D: DeviceOperations + ?Sized,
        S: ConfigStore,
    {
        let mut report = SyncReport::new(Direction::Load, device.name());

        for entry in self.catalog.symbologies() {
            let enable = Self::enable_item(entry);
            if !Self::load_config(device, store, &enable, &mut report) {
                continue;
            }
            for setting in self.catalog.settings_for(entry) {
                let item = Self::setting_item(entry, setting);
                Self::load_config(device, store, &item, &mut report);
            }
        }

        for desc in controls(device) {
            let Some(key) = Self::persisted_key(&desc, &mut report) else {
                continue;
            };
            let current = match device.get_control(&desc.name) {
                Ok(value) => value,
                Err(e) => {
                    debug!(control = %desc.name, reason = %e, "Skipping unreadable control");
                    report.push(SyncEntry::skipped(CAMERA_GROUP, key, e.reason));
                    continue;
                }
            };
            let value = store.get(CAMERA_GROUP, key.as_str(), current);
            match device.set_control(&desc.name, value) {
                Ok(()) => {
                    debug!(%key, value, "Loaded control");
                    report.push(SyncEntry::applied(CAMERA_GROUP, key, value));
                }
                Err(e) => {
                    warn!(%key, value, reason = %e, "Device rejected stored value");
                    report.push(SyncEntry::rejected(CAMERA_GROUP, key, value, e.reason));
                }
            }
        }

        let summary = report.summary();
        info!(
            applied = summary.applied,
            skipped = summary.skipped,
            rejected = summary.rejected,
            "Load finished"
        );
        report
    }

    /// Copy what the device reports now into the store. Never writes to the device.
    #[instrument(skip_all, fields(device = device.name()))]
    pub fn save<D, S>(&self, device: &D, store: &mut StoreAdapter<S>) -> SyncReport
    where
        D: DeviceOperations + ?Sized,
        S: ConfigStore,
    {
        let mut report = SyncReport::new(Direction::Save, device.name());

        for entry in self.catalog.symbologies() {
            let enable = Self::enable_item(entry);
            if !Self::save_config(device, store, enable, &mut report) {
                continue;
            }
            for setting in self.catalog.settings_for(entry) {
                Self::save_config(device, store, Self::setting_item(entry, setting), &mut report);
            }
        }

        for desc in controls(device) {
            let Some(key) = Self::persisted_key(&desc, &mut report) else {
                continue;
            };
            match device.get_control(&desc.name) {
                Ok(value) => {
                    store.set(CAMERA_GROUP, key.as_str(), value);
                    debug!(%key, value, "Saved control");
                    report.push(SyncEntry::persisted(CAMERA_GROUP, key, value));
                }
                Err(e) => {
                    debug!(control = %desc.name, reason = %e, "Skipping unreadable control");
                    report.push(SyncEntry::skipped(CAMERA_GROUP, key, e.reason));
                }
            }
        }

        let summary = report.summary();
        info!(
            persisted = summary.persisted,
            skipped = summary.skipped,
            "Save finished"
        );
        report
    }

    /// Apply one user change to the device and persist the result.
    #[instrument(skip(self, device, store), fields(device = device.name()))]
    pub fn apply_edit<D, S>(
        &self,
        device: &D,
        store: &mut StoreAdapter<S>,
        edit: &ControlEdit,
    ) -> Result<SyncEntry>
    where
        D: DeviceOperations + ?Sized,
        S: ConfigStore,
    {
        match edit {
            ControlEdit::SymbologyEnabled { symbology, enabled } => {
                let entry = self.catalog.entry_for(*symbology)?;
                let item = Self::enable_item(entry);
                Self::edit_config(device, store, item, i64::from(*enabled))
            }
            ControlEdit::SymbologySetting {
                symbology,
                setting,
                value,
            } => {
                let entry = self.catalog.entry_for(*symbology)?;
                if entry.aggregate {
                    return Err(ScanError::AggregateHasNoSettings {
                        name: entry.name.to_string(),
                    });
                }
                let setting = self.catalog.setting_entry(*setting)?;
                let item = Self::setting_item(entry, setting);
                Self::edit_config(device, store, item, *value)
            }
            ControlEdit::Control { name, value } => {
                let desc = find_control(device, name).ok_or_else(|| ScanError::UnknownControl {
                    name: name.clone(),
                })?;
                Self::edit_control(device, store, &desc, *value)
            }
        }
    }

    /// Apply edits in order, persisting each one as it succeeds.
    ///
    /// Stops at the first edit that fails; earlier edits stay applied.
    pub fn apply_edits<D, S>(
        &self,
        device: &D,
        store: &mut StoreAdapter<S>,
        edits: &[ControlEdit],
    ) -> Result<SyncReport>
    where
        D: DeviceOperations + ?Sized,
        S: ConfigStore,
    {
        let mut report = SyncReport::new(Direction::Edit, device.name());
        for edit in edits {
            report.push(self.apply_edit(device, store, edit)?);
        }
        Ok(report)
    }

    /// Current state of every readable symbology, setting and control.
    #[instrument(skip_all, fields(device = device.name()))]
    pub fn resolve_model<D>(&self, device: &D) -> ControlModel
    where
        D: DeviceOperations + ?Sized,
    {
        let mut model = ControlModel::new(device.name());

        for entry in self.catalog.symbologies() {
            let Ok(enabled) = device.get_config(entry.symbology, DecoderSetting::Enable) else {
                continue;
            };
            let settings = self
                .catalog
                .settings_for(entry)
                .iter()
                .filter_map(|setting| {
                    device
                        .get_config(entry.symbology, setting.setting)
                        .ok()
                        .map(|value| SettingState {
                            name: setting.name,
                            key: setting_key(entry, setting),
                            kind: setting.kind,
                            value,
                        })
                })
                .collect();
            model.symbologies.push(SymbologyState {
                name: entry.name,
                symbology: entry.symbology,
                key: enable_key(entry),
                aggregate: entry.aggregate,
                enabled: enabled != 0,
                settings,
            });
        }

        for desc in controls(device) {
            if matches!(desc.kind, ControlKind::Unsupported { .. }) {
                continue;
            }
            let value = if desc.kind.is_persistent() {
                device
                    .get_control(&desc.name)
                    .ok()
                    .or_else(|| desc.kind.default_value())
            } else {
                None
            };
            let key = desc.kind.is_persistent().then(|| control_key(&desc.name));
            model.push_control(
                &desc.group,
                ControlState {
                    index: desc.index,
                    name: desc.name,
                    key,
                    kind: desc.kind,
                    value,
                },
            );
        }

        debug!(
            symbologies = model.symbologies.len(),
            controls = model.control_count(),
            "Model resolved"
        );
        model
    }

    // === Pass helpers ===

    fn enable_item(entry: &SymbologyEntry) -> CatalogItem {
        CatalogItem {
            symbology: entry.symbology,
            setting: DecoderSetting::Enable,
            key: enable_key(entry),
        }
    }

    fn setting_item(entry: &SymbologyEntry, setting: &SettingEntry) -> CatalogItem {
        CatalogItem {
            symbology: entry.symbology,
            setting: setting.setting,
            key: setting_key(entry, setting),
        }
    }

    /// Store key for a persistent control; other kinds are recorded as skipped.
    fn persisted_key(desc: &ControlDescriptor, report: &mut SyncReport) -> Option<PersistedKey> {
        let key = control_key(&desc.name);
        match &desc.kind {
            kind if kind.is_persistent() => Some(key),
            ControlKind::Button => {
                report.push(SyncEntry::skipped(CAMERA_GROUP, key, "momentary action"));
                None
            }
            ControlKind::Unsupported { typ } => {
                report.push(SyncEntry::skipped(
                    CAMERA_GROUP,
                    key,
                    format!("unsupported control type {typ}"),
                ));
                None
            }
            _ => None,
        }
    }

    /// Returns false when the current value could not be read.
    fn load_config<D, S>(
        device: &D,
        store: &mut StoreAdapter<S>,
        item: &CatalogItem,
        report: &mut SyncReport,
    ) -> bool
    where
        D: DeviceOperations + ?Sized,
        S: ConfigStore,
    {
        let current = match device.get_config(item.symbology, item.setting) {
            Ok(value) => value,
            Err(e) => {
                debug!(key = %item.key, reason = %e, "Skipping unavailable decoder setting");
                report.push(SyncEntry::skipped(SYMBOLOGY_GROUP, item.key.clone(), e.reason));
                return false;
            }
        };
        let value = store.get(SYMBOLOGY_GROUP, item.key.as_str(), current);
        match device.set_config(item.symbology, item.setting, value) {
            Ok(()) => {
                debug!(key = %item.key, value, "Loaded decoder setting");
                report.push(SyncEntry::applied(SYMBOLOGY_GROUP, item.key.clone(), value));
            }
            Err(e) => {
                warn!(key = %item.key, value, reason = %e, "Decoder rejected stored value");
                report.push(SyncEntry::rejected(
                    SYMBOLOGY_GROUP,
                    item.key.clone(),
                    value,
                    e.reason,
                ));
            }
        }
        true
    }

    /// Returns false when the current value could not be read.
    fn save_config<D, S>(
        device: &D,
        store: &mut StoreAdapter<S>,
        item: CatalogItem,
        report: &mut SyncReport,
    ) -> bool
    where
        D: DeviceOperations + ?Sized,
        S: ConfigStore,
    {
        match device.get_config(item.symbology, item.setting) {
            Ok(value) => {
                store.set(SYMBOLOGY_GROUP, item.key.as_str(), value);
                debug!(key = %item.key, value, "Saved decoder setting");
                report.push(SyncEntry::persisted(SYMBOLOGY_GROUP, item.key, value));
                true
            }
            Err(e) => {
                debug!(key = %item.key, reason = %e, "Skipping unavailable decoder setting");
                report.push(SyncEntry::skipped(SYMBOLOGY_GROUP, item.key, e.reason));
                false
            }
        }
    }

    fn edit_config<D, S>(
        device: &D,
        store: &mut StoreAdapter<S>,
        item: CatalogItem,
        value: i64,
    ) -> Result<SyncEntry>
    where
        D: DeviceOperations + ?Sized,
        S: ConfigStore,
    {
        device
            .set_config(item.symbology, item.setting, value)
            .map_err(|e| ScanError::ControlRejected {
                name: item.key.to_string(),
                value,
                reason: e.reason,
            })?;
        let stored = device
            .get_config(item.symbology, item.setting)
            .unwrap_or(value);
        store.set(SYMBOLOGY_GROUP, item.key.as_str(), stored);
        info!(key = %item.key, value = stored, "Decoder setting changed");
        Ok(SyncEntry::persisted(SYMBOLOGY_GROUP, item.key, stored))
    }

    fn edit_control<D, S>(
        device: &D,
        store: &mut StoreAdapter<S>,
        desc: &ControlDescriptor,
        value: i64,
    ) -> Result<SyncEntry>
    where
        D: DeviceOperations + ?Sized,
        S: ConfigStore,
    {
        let key = control_key(&desc.name);
        if let ControlKind::Unsupported { typ } = &desc.kind {
            return Err(ScanError::ControlRejected {
                name: desc.name.clone(),
                value,
                reason: format!("unsupported control type {typ}"),
            });
        }

        device
            .set_control(&desc.name, value)
            .map_err(|e| ScanError::ControlRejected {
                name: desc.name.clone(),
                value,
                reason: e.reason,
            })?;

        if !desc.kind.is_persistent() {
            info!(control = %desc.name, "Action triggered");
            return Ok(SyncEntry::applied(CAMERA_GROUP, key, value));
        }

        let stored = device.get_control(&desc.name).unwrap_or(value);
        store.set(CAMERA_GROUP, key.as_str(), stored);
        info!(%key, value = stored, "Control changed");
        Ok(SyncEntry::persisted(CAMERA_GROUP, key, stored))
    }
}

/// Find a control by display name, falling back to its store key.
fn find_control<D>(device: &D, name: &str) -> Option<ControlDescriptor>
where
    D: DeviceOperations + ?Sized,
{
    let all: Vec<ControlDescriptor> = controls(device).collect();
    let by_name = all.iter().position(|desc| desc.name == name);
    let index = by_name.or_else(|| {
        all.iter()
            .position(|desc| control_key(&desc.name).as_str() == name)
    })?;
    all.into_iter().nth(index)
}
