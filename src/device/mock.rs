//! Mock scanner implementation for testing and `--mock` runs.
//!
//! Records every device and decoder access and supports failure injection.
//!
//! # Example
//!
//! ```rust,ignore
//! use scanctl::device::mock::{MockDevice, Operation};
//! use scanctl::device::DeviceOperations;
//!
//! let mock = MockDevice::webcam();
//! mock.set_control("Auto Focus", 1).unwrap();
//!
//! mock.assert_contains(&Operation::SetControl {
//!     name: "Auto Focus".to_string(),
//!     value: 1,
//! });
//! ```

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, trace};

use super::{DecoderConfig, DeviceOperations};
use crate::catalog::{DecoderSetting, Symbology};
use crate::control::{ControlType, MenuItem, RawControl};
use crate::error::{ControlResult, Unavailable};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    GetControl {
        name: String,
    },
    SetControl {
        name: String,
        value: i64,
    },
    GetConfig {
        symbology: Symbology,
        setting: DecoderSetting,
    },
    SetConfig {
        symbology: Symbology,
        setting: DecoderSetting,
        value: i64,
    },
    QueryControl {
        index: usize,
    },
    QueryMenu {
        index: usize,
    },
}

impl Operation {
    /// True for operations that change device or decoder state.
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::SetControl { .. } | Self::SetConfig { .. })
    }
}

#[derive(Debug, Clone)]
struct MockControl {
    raw: RawControl,
    menu: Vec<MenuItem>,
    value: i64,
}

impl MockControl {
    fn new(raw: RawControl, menu: Vec<MenuItem>) -> Self {
        let value = raw.default;
        Self { raw, menu, value }
    }

    fn accept(&self, value: i64) -> ControlResult<i64> {
        match self.raw.typ {
            ControlType::Boolean => Ok(i64::from(value != 0)),
            ControlType::Integer | ControlType::Integer64 => {
                if value < self.raw.minimum || value > self.raw.maximum {
                    Err(Unavailable::new(format!(
                        "{value} outside {}..={}",
                        self.raw.minimum, self.raw.maximum
                    )))
                } else {
                    Ok(value)
                }
            }
            ControlType::Menu | ControlType::IntegerMenu => {
                if self.menu.iter().any(|item| item.value == value) {
                    Ok(value)
                } else {
                    Err(Unavailable::new(format!("{value} is not a menu option")))
                }
            }
            ControlType::Button => Ok(self.value),
            ControlType::Other(ref typ) => {
                Err(Unavailable::new(format!("cannot set {typ} control")))
            }
        }
    }
}

#[derive(Debug, Default)]
struct Failures {
    reads: HashSet<String>,
    writes: HashSet<String>,
    configs: HashSet<(Symbology, DecoderSetting)>,
}

/// Mock scanner for testing without real hardware.
pub struct MockDevice {
    name: String,
    controls: Mutex<Vec<MockControl>>,
    decoder: DecoderConfig,
    failures: Mutex<Failures>,
    operation_log: Mutex<Vec<Operation>>,
}

impl MockDevice {
    /// Create a mock with no camera controls.
    #[must_use]
    pub fn new() -> Self {
        MockDeviceBuilder::new().build()
    }

    /// Create a mock resembling a typical UVC webcam.
    #[must_use]
    pub fn webcam() -> Self {
        MockDeviceBuilder::webcam().build()
    }

    // === Lifecycle Simulation ===

    /// Replace the control table, as a device does across disable/enable.
    ///
    /// Values reset to each control's default.
    pub fn replace_controls(&self, controls: Vec<RawControl>) {
        debug!(count = controls.len(), "Replacing mock control set");
        *self.controls.lock().unwrap() = controls
            .into_iter()
            .map(|raw| MockControl::new(raw, Vec::new()))
            .collect();
    }

    // === Failure Injection ===

    /// Make reads of the named control fail.
    pub fn fail_reads(&self, name: &str) {
        self.failures.lock().unwrap().reads.insert(name.to_string());
    }

    /// Make writes to the named control fail.
    pub fn reject_writes(&self, name: &str) {
        self.failures.lock().unwrap().writes.insert(name.to_string());
    }

    /// Make a decoder setting unavailable for reads and writes.
    pub fn fail_config(&self, symbology: Symbology, setting: DecoderSetting) {
        self.failures
            .lock()
            .unwrap()
            .configs
            .insert((symbology, setting));
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        *self.failures.lock().unwrap() = Failures::default();
    }

    // === Inspection ===

    /// Current value of a control, bypassing the operation log.
    #[must_use]
    pub fn control_value(&self, name: &str) -> Option<i64> {
        self.controls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.raw.name == name)
            .map(|c| c.value)
    }

    /// Current decoder value, bypassing the operation log.
    #[must_use]
    pub fn config_value(&self, symbology: Symbology, setting: DecoderSetting) -> Option<i64> {
        self.decoder.get(symbology, setting).ok()
    }

    // === Assertions ===

    /// Get all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.operation_log.lock().unwrap().clone()
    }

    /// Get the number of operations performed.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operation_log.lock().unwrap().len()
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.operation_log.lock().unwrap().clear();
    }

    /// Assert a specific operation was performed at least once.
    ///
    /// # Panics
    ///
    /// Panics if the operation was not found.
    pub fn assert_contains(&self, expected: &Operation) {
        let ops = self.operations();
        assert!(
            ops.contains(expected),
            "Expected operation {expected:?} not found in: {ops:#?}",
        );
    }

    /// Assert an operation was never performed.
    ///
    /// # Panics
    ///
    /// Panics if the operation was recorded.
    pub fn assert_not_contains(&self, unexpected: &Operation) {
        let ops = self.operations();
        assert!(
            !ops.contains(unexpected),
            "Unexpected operation {unexpected:?} found in: {ops:#?}",
        );
    }

    /// Assert nothing was written to the device or decoder.
    ///
    /// # Panics
    ///
    /// Panics if any write was recorded.
    pub fn assert_no_writes(&self) {
        let writes: Vec<_> = self
            .operations()
            .into_iter()
            .filter(Operation::is_write)
            .collect();
        assert!(writes.is_empty(), "Expected no writes, but found: {writes:#?}");
    }

    // === Internal Helpers ===

    fn record_op(&self, op: Operation) {
        trace!(?op, "Recording operation");
        self.operation_log.lock().unwrap().push(op);
    }

    fn check_config(&self, symbology: Symbology, setting: DecoderSetting) -> ControlResult<()> {
        if self
            .failures
            .lock()
            .unwrap()
            .configs
            .contains(&(symbology, setting))
        {
            return Err(Unavailable::new(format!(
                "Mock {symbology:?}/{setting:?} configured to fail"
            )));
        }
        Ok(())
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceOperations for MockDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_control(&self, name: &str) -> ControlResult<i64> {
        self.record_op(Operation::GetControl {
            name: name.to_string(),
        });
        if self.failures.lock().unwrap().reads.contains(name) {
            return Err(Unavailable::new(format!("Mock control '{name}' configured to fail")));
        }

        let controls = self.controls.lock().unwrap();
        let control = controls
            .iter()
            .find(|c| c.raw.name == name)
            .ok_or_else(|| Unavailable::new(format!("no control named '{name}'")))?;
        match control.raw.typ {
            ControlType::Button => Err(Unavailable::new("button controls are write-only")),
            _ => Ok(control.value),
        }
    }

    fn set_control(&self, name: &str, value: i64) -> ControlResult<()> {
        self.record_op(Operation::SetControl {
            name: name.to_string(),
            value,
        });
        if self.failures.lock().unwrap().writes.contains(name) {
            return Err(Unavailable::new(format!("Mock control '{name}' rejects writes")));
        }

        let mut controls = self.controls.lock().unwrap();
        let control = controls
            .iter_mut()
            .find(|c| c.raw.name == name)
            .ok_or_else(|| Unavailable::new(format!("no control named '{name}'")))?;
        control.value = control.accept(value)?;
        Ok(())
    }

    fn get_config(&self, symbology: Symbology, setting: DecoderSetting) -> ControlResult<i64> {
        self.record_op(Operation::GetConfig { symbology, setting });
        self.check_config(symbology, setting)?;
        self.decoder.get(symbology, setting)
    }

    fn set_config(
        &self,
        symbology: Symbology,
        setting: DecoderSetting,
        value: i64,
    ) -> ControlResult<()> {
        self.record_op(Operation::SetConfig {
            symbology,
            setting,
            value,
        });
        self.check_config(symbology, setting)?;
        self.decoder.set(symbology, setting, value)
    }

    fn control_at(&self, index: usize) -> Option<RawControl> {
        self.record_op(Operation::QueryControl { index });
        self.controls
            .lock()
            .unwrap()
            .get(index)
            .map(|c| c.raw.clone())
    }

    fn menu(&self, index: usize) -> Vec<MenuItem> {
        self.record_op(Operation::QueryMenu { index });
        self.controls
            .lock()
            .unwrap()
            .get(index)
            .map(|c| c.menu.clone())
            .unwrap_or_default()
    }
}

/// Builder for creating `MockDevice` with common configurations.
pub struct MockDeviceBuilder {
    name: String,
    controls: Vec<MockControl>,
    failures: Failures,
}

impl Default for MockDeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDeviceBuilder {
    /// Start from a device without controls.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "Mock Scanner".to_string(),
            controls: Vec::new(),
            failures: Failures::default(),
        }
    }

    /// Start from the webcam control set.
    #[must_use]
    pub fn webcam() -> Self {
        Self::new()
            .named("Mock UVC Webcam")
            .with_control(
                RawControl::new("Brightness", "User", ControlType::Integer).range(-64, 64, 1),
            )
            .with_control(
                RawControl::new("Contrast", "User", ControlType::Integer)
                    .range(0, 95, 1)
                    .default_value(32),
            )
            .with_control(
                RawControl::new("White Balance Temperature, Auto", "User", ControlType::Boolean)
                    .default_value(1),
            )
            .with_menu_control(
                RawControl::new("Power Line Frequency", "User", ControlType::Menu)
                    .range(0, 2, 1)
                    .default_value(1),
                vec![
                    MenuItem::new(0, "Disabled"),
                    MenuItem::new(1, "50 Hz"),
                    MenuItem::new(2, "60 Hz"),
                ],
            )
            .with_menu_control(
                RawControl::new("Exposure, Auto", "Camera", ControlType::Menu)
                    .range(1, 3, 1)
                    .default_value(3),
                vec![
                    MenuItem::new(1, "Manual Mode"),
                    MenuItem::new(3, "Aperture Priority Mode"),
                ],
            )
            .with_control(
                RawControl::new("Exposure (Absolute)", "Camera", ControlType::Integer)
                    .range(1, 5000, 1)
                    .default_value(156),
            )
            .with_control(
                RawControl::new("Focus (absolute)", "Camera", ControlType::Integer)
                    .range(0, 250, 5),
            )
            .with_control(RawControl::new("Auto Focus", "Camera", ControlType::Boolean))
            .with_control(RawControl::new("Pan/Tilt Reset", "Camera", ControlType::Button))
    }

    /// Set the device name.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Append a control; its value starts at the control's default.
    #[must_use]
    pub fn with_control(mut self, raw: RawControl) -> Self {
        self.controls.push(MockControl::new(raw, Vec::new()));
        self
    }

    /// Append a menu control with its options.
    #[must_use]
    pub fn with_menu_control(mut self, raw: RawControl, options: Vec<MenuItem>) -> Self {
        self.controls.push(MockControl::new(raw, options));
        self
    }

    /// Override the current value of an already added control.
    #[must_use]
    pub fn with_value(mut self, name: &str, value: i64) -> Self {
        if let Some(control) = self.controls.iter_mut().find(|c| c.raw.name == name) {
            control.value = value;
        }
        self
    }

    /// Make reads of a control fail.
    #[must_use]
    pub fn failing_read(mut self, name: &str) -> Self {
        self.failures.reads.insert(name.to_string());
        self
    }

    /// Make writes to a control fail.
    #[must_use]
    pub fn rejecting_write(mut self, name: &str) -> Self {
        self.failures.writes.insert(name.to_string());
        self
    }

    /// Make a decoder setting unavailable.
    #[must_use]
    pub fn failing_config(mut self, symbology: Symbology, setting: DecoderSetting) -> Self {
        self.failures.configs.insert((symbology, setting));
        self
    }

    /// Build the mock device.
    #[must_use]
    pub fn build(self) -> MockDevice {
        debug!(name = %self.name, controls = self.controls.len(), "Creating mock device");
        MockDevice {
            name: self.name,
            controls: Mutex::new(self.controls),
            decoder: DecoderConfig::new(),
            failures: Mutex::new(self.failures),
            operation_log: Mutex::new(Vec::new()),
        }
    }
}
