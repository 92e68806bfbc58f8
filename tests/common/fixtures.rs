//! Scanner and store fixtures.

use std::path::PathBuf;

use scanctl::control::{ControlType, MenuItem, RawControl};
use scanctl::device::mock::{MockDevice, MockDeviceBuilder};
use scanctl::store::{MemoryStore, StoreAdapter};
use tempfile::TempDir;

/// Adapter over a fresh in-memory store.
#[must_use]
pub fn memory_adapter() -> StoreAdapter<MemoryStore> {
    StoreAdapter::new(MemoryStore::new())
}

/// Temporary directory plus a settings path inside it.
///
/// Keep the `TempDir` alive for as long as the path is used.
#[must_use]
pub fn temp_store(file_name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(file_name);
    (dir, path)
}

/// Scanner exposing a single boolean "Auto Focus" control.
#[must_use]
pub fn auto_focus_scanner(value: i64) -> MockDevice {
    MockDeviceBuilder::new()
        .named("Focus Cam")
        .with_control(RawControl::new("Auto Focus", "Camera", ControlType::Boolean))
        .with_value("Auto Focus", value)
        .build()
}

/// Two controls whose names collide after key sanitizing.
#[must_use]
pub fn colliding_scanner() -> MockDevice {
    MockDeviceBuilder::new()
        .with_control(
            RawControl::new("Foo Bar", "User", ControlType::Integer)
                .range(0, 100, 1)
                .default_value(10),
        )
        .with_control(
            RawControl::new("Foo_Bar", "User", ControlType::Integer)
                .range(0, 100, 1)
                .default_value(20),
        )
        .build()
}

/// Replacement control set used to simulate a device coming back changed.
#[must_use]
pub fn replacement_controls() -> Vec<RawControl> {
    vec![
        RawControl::new("Zoom, Absolute", "Camera", ControlType::Integer)
            .range(100, 500, 1)
            .default_value(100),
        RawControl::new("Privacy", "Camera", ControlType::Boolean),
    ]
}

/// A menu control with non-contiguous option values.
#[must_use]
pub fn menu_scanner() -> MockDevice {
    MockDeviceBuilder::new()
        .with_menu_control(
            RawControl::new("Exposure, Auto", "Camera", ControlType::Menu).default_value(3),
            vec![MenuItem::new(1, "Manual Mode"), MenuItem::new(3, "Aperture Priority Mode")],
        )
        .build()
}
