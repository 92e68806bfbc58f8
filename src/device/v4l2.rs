//! Video4Linux2 camera backend.
//!
//! Camera controls come from the kernel's control table; decoder settings
//! live in an in-process [`DecoderConfig`].

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, trace};
use v4l::Device;
use v4l::control::{Control, Description, Flags, Type, Value};

use super::{DecoderConfig, DeviceOperations};
use crate::catalog::{DecoderSetting, Symbology};
use crate::control::{ControlType, MenuItem, RawControl};
use crate::error::{ControlResult, Result, ScanError, Unavailable};

const DEFAULT_GROUP: &str = "User";

/// Owned copy of one kernel control description.
#[derive(Debug, Clone)]
struct TableEntry {
    id: u32,
    raw: RawControl,
    items: Vec<MenuItem>,
}

impl TableEntry {
    fn from_description(desc: Description, group: &str) -> Self {
        let items = desc
            .items
            .as_ref()
            .map(|items| {
                items
                    .iter()
                    .map(|(value, item)| MenuItem::new(i64::from(*value), item.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: desc.id,
            raw: RawControl {
                typ: control_type(desc.typ),
                minimum: desc.minimum,
                maximum: desc.maximum,
                default: desc.default,
                step: i64::try_from(desc.step).unwrap_or(i64::MAX),
                name: desc.name,
                group: group.to_string(),
            },
            items,
        }
    }
}

/// A V4L2 camera paired with a decoder.
pub struct V4l2Scanner {
    name: String,
    device: Device,
    table: Mutex<Vec<TableEntry>>,
    decoder: DecoderConfig,
}

impl V4l2Scanner {
    /// Open the camera node at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScanError::DeviceNotFound {
                path: path.display().to_string(),
            });
        }

        let device = Device::with_path(path).map_err(|e| ScanError::DeviceOpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = device
            .query_caps()
            .map(|caps| caps.card)
            .unwrap_or_else(|_| path.display().to_string());
        info!(path = %path.display(), %name, "Opened video device");

        Ok(Self {
            name,
            device,
            table: Mutex::new(Vec::new()),
            decoder: DecoderConfig::new(),
        })
    }

    /// Re-read the kernel control table.
    fn refresh(&self) -> Vec<TableEntry> {
        let descriptions = match self.device.query_controls() {
            Ok(descriptions) => descriptions,
            Err(e) => {
                debug!(error = %e, "Querying controls failed");
                Vec::new()
            }
        };

        let mut group = DEFAULT_GROUP.to_string();
        let mut entries = Vec::with_capacity(descriptions.len());
        for desc in descriptions {
            if matches!(desc.typ, Type::CtrlClass) {
                group = class_group_name(&desc.name);
                continue;
            }
            if desc.flags.contains(Flags::DISABLED) {
                trace!(name = %desc.name, "Skipping disabled control");
                continue;
            }
            entries.push(TableEntry::from_description(desc, &group));
        }
        debug!(count = entries.len(), "Control table refreshed");

        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.clone_from(&entries);
        entries
    }

    fn lookup(&self, name: &str) -> ControlResult<TableEntry> {
        let cached = self
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|entry| entry.raw.name == name)
            .cloned();

        cached
            .or_else(|| {
                self.refresh()
                    .into_iter()
                    .find(|entry| entry.raw.name == name)
            })
            .ok_or_else(|| Unavailable::new(format!("no control named '{name}'")))
    }
}

impl DeviceOperations for V4l2Scanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_control(&self, name: &str) -> ControlResult<i64> {
        let entry = self.lookup(name)?;
        if entry.raw.typ == ControlType::Button {
            return Err(Unavailable::new("button controls are write-only"));
        }
        let control = self
            .device
            .control(entry.id)
            .map_err(|e| Unavailable::new(e.to_string()))?;
        match control.value {
            Value::Integer(value) => Ok(value),
            Value::Boolean(value) => Ok(i64::from(value)),
            _ => Err(Unavailable::new(format!("'{name}' has no integer value"))),
        }
    }

    fn set_control(&self, name: &str, value: i64) -> ControlResult<()> {
        let entry = self.lookup(name)?;
        let value = match entry.raw.typ {
            ControlType::Boolean => Value::Boolean(value != 0),
            // The kernel ignores the payload of a button press.
            ControlType::Button => Value::Integer(0),
            _ => Value::Integer(value),
        };
        self.device
            .set_control(Control { id: entry.id, value })
            .map_err(|e| Unavailable::new(e.to_string()))
    }

    fn get_config(&self, symbology: Symbology, setting: DecoderSetting) -> ControlResult<i64> {
        self.decoder.get(symbology, setting)
    }

    fn set_config(
        &self,
        symbology: Symbology,
        setting: DecoderSetting,
        value: i64,
    ) -> ControlResult<()> {
        self.decoder.set(symbology, setting, value)
    }

    fn control_at(&self, index: usize) -> Option<RawControl> {
        if index == 0 {
            return self.refresh().into_iter().next().map(|entry| entry.raw);
        }
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .map(|entry| entry.raw.clone())
    }

    fn menu(&self, index: usize) -> Vec<MenuItem> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .map(|entry| entry.items.clone())
            .unwrap_or_default()
    }
}

fn control_type(typ: Type) -> ControlType {
    match typ {
        Type::Integer => ControlType::Integer,
        Type::Integer64 => ControlType::Integer64,
        Type::Boolean => ControlType::Boolean,
        Type::Menu => ControlType::Menu,
        Type::IntegerMenu => ControlType::IntegerMenu,
        Type::Button => ControlType::Button,
        other => ControlType::Other(format!("{other:?}")),
    }
}

/// "Camera Controls" -> "Camera".
fn class_group_name(class_name: &str) -> String {
    class_name
        .strip_suffix(" Controls")
        .unwrap_or(class_name)
        .to_string()
}
