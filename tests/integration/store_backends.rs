//! Persistence through the TOML and SQLite backends.

use std::fs;

use scanctl::device::DeviceOperations;
use scanctl::device::mock::MockDevice;
use scanctl::store::{ConfigStore, SqliteStore, StoreAdapter, TomlStore, open_store};
use scanctl::sync::{CAMERA_GROUP, Synchronizer};

use crate::common::fixtures::temp_store;

fn save_then_load(file_name: &str) {
    let (_dir, path) = temp_store(file_name);
    let sync = Synchronizer::default();

    let source = MockDevice::webcam();
    source.set_control("Contrast", 70).unwrap();
    source.set_control("Auto Focus", 1).unwrap();
    {
        let mut store = StoreAdapter::new(open_store(&path).unwrap());
        sync.save(&source, &mut store);
        store.flush();
    }

    let target = MockDevice::webcam();
    let mut store = StoreAdapter::new(open_store(&path).unwrap());
    sync.load(&target, &mut store);
    assert_eq!(target.control_value("Contrast"), Some(70));
    assert_eq!(target.control_value("Auto Focus"), Some(1));
}

#[test]
fn test_toml_round_trip() {
    save_then_load("scanctl.toml");
}

#[test]
fn test_sqlite_round_trip() {
    save_then_load("scanctl.db");
}

#[test]
fn test_toml_layout() {
    let (_dir, path) = temp_store("layout.toml");
    {
        let mut store = StoreAdapter::new(TomlStore::open(&path).unwrap());
        Synchronizer::default().save(&MockDevice::webcam(), &mut store);
    }

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[Camera]"));
    assert!(content.contains("[Symbology]"));
    assert!(content.contains("White_Balance_Temperature_Auto = 1"));
    assert!(content.contains("Exposure_Absolute = 156"));
    assert!(!content.contains("Pan_Tilt_Reset"));
}

#[test]
fn test_hand_edited_toml_is_honored() {
    let (_dir, path) = temp_store("edited.toml");
    fs::write(
        &path,
        "[Camera]\nAuto_Focus = true\nContrast = \"64\"\nBrightness = \"bright\"\n",
    )
    .unwrap();

    let device = MockDevice::webcam();
    let mut store = StoreAdapter::new(TomlStore::open(&path).unwrap());
    Synchronizer::default().load(&device, &mut store);

    assert_eq!(device.control_value("Auto Focus"), Some(1));
    assert_eq!(device.control_value("Contrast"), Some(64));
    // Malformed value falls back to the device's current value.
    assert_eq!(device.control_value("Brightness"), Some(0));
}

#[test]
fn test_sqlite_group_scoping() {
    let mut store = SqliteStore::in_memory().unwrap();
    store.begin_group(CAMERA_GROUP);
    store.set("Gain", 5).unwrap();
    store.end_group();

    assert_eq!(store.get("Gain").unwrap(), None);
    let mut adapter = StoreAdapter::new(store);
    assert_eq!(adapter.get(CAMERA_GROUP, "Gain", 0), 5);
    assert!(adapter.store().updated_at(CAMERA_GROUP, "Gain").unwrap().is_some());
}

#[test]
fn test_unwritable_store_does_not_abort_save() {
    let (_dir, path) = temp_store("settings.toml");
    let mut store = StoreAdapter::new(TomlStore::open(&path).unwrap());
    // A directory in place of the file makes every flush fail.
    fs::create_dir(&path).unwrap();

    let report = Synchronizer::default().save(&MockDevice::webcam(), &mut store);
    store.flush();

    assert!(report.summary().persisted > 0);
    assert!(store.store().is_dirty());
    assert!(path.is_dir());
}
