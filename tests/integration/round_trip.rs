//! Save followed by load restores exactly what was saved.

use scanctl::catalog::{DecoderSetting, Symbology};
use scanctl::device::DeviceOperations;
use scanctl::device::mock::{MockDevice, Operation};
use scanctl::sanitize::control_key;
use scanctl::sync::{CAMERA_GROUP, ControlEdit, Outcome, SYMBOLOGY_GROUP, Synchronizer};

use crate::common::fixtures::{auto_focus_scanner, colliding_scanner, memory_adapter, menu_scanner};
use crate::common::init_test_logging;

#[test]
fn test_webcam_round_trip() {
    init_test_logging();
    let sync = Synchronizer::default();
    let mut store = memory_adapter();

    let source = MockDevice::webcam();
    source.set_control("Brightness", -20).unwrap();
    source.set_control("Power Line Frequency", 2).unwrap();
    source.set_control("Focus (absolute)", 125).unwrap();
    sync.save(&source, &mut store);

    let target = MockDevice::webcam();
    let report = sync.load(&target, &mut store);

    assert!(report.is_clean());
    assert_eq!(target.control_value("Brightness"), Some(-20));
    assert_eq!(target.control_value("Power Line Frequency"), Some(2));
    assert_eq!(target.control_value("Focus (absolute)"), Some(125));
    assert_eq!(target.control_value("Contrast"), Some(32));
}

#[test]
fn test_boolean_control_scenario() {
    let sync = Synchronizer::default();
    let mut store = memory_adapter();

    sync.save(&auto_focus_scanner(1), &mut store);
    assert_eq!(store.store().int(CAMERA_GROUP, "Auto_Focus"), Some(1));

    let target = auto_focus_scanner(0);
    sync.load(&target, &mut store);
    target.assert_contains(&Operation::SetControl {
        name: "Auto Focus".to_string(),
        value: 1,
    });
    assert_eq!(target.get_control("Auto Focus"), Ok(1));
}

#[cfg(feature = "code39")]
#[test]
fn test_decoder_settings_round_trip() {
    let sync = Synchronizer::default();
    let mut store = memory_adapter();

    let source = MockDevice::new();
    sync.apply_edits(
        &source,
        &mut store,
        &[
            ControlEdit::SymbologySetting {
                symbology: Symbology::Code39,
                setting: DecoderSetting::MinLength,
                value: 4,
            },
            ControlEdit::SymbologyEnabled {
                symbology: Symbology::Composite,
                enabled: true,
            },
        ],
    )
    .unwrap();
    assert_eq!(store.store().int(SYMBOLOGY_GROUP, "Code-39.min-length"), Some(4));
    assert_eq!(store.store().int(SYMBOLOGY_GROUP, "Composite_codes.enable"), Some(1));

    let target = MockDevice::new();
    sync.load(&target, &mut store);
    target.assert_contains(&Operation::SetConfig {
        symbology: Symbology::Code39,
        setting: DecoderSetting::MinLength,
        value: 4,
    });
    assert_eq!(
        target.config_value(Symbology::Composite, DecoderSetting::Enable),
        Some(1)
    );
}

#[cfg(feature = "i25")]
#[test]
fn test_catalog_keys_replace_spaces() {
    let sync = Synchronizer::default();
    let mut store = memory_adapter();
    sync.save(&MockDevice::new(), &mut store);

    let keys = store.store().keys(SYMBOLOGY_GROUP);
    assert!(keys.contains(&"Code_2_of_5_interlaced.enable".to_string()));
    assert!(keys.contains(&"Code_2_of_5_interlaced.min-length".to_string()));
    assert!(keys.iter().all(|key| !key.contains(' ')));
}

#[test]
fn test_menu_value_round_trip() {
    let sync = Synchronizer::default();
    let mut store = memory_adapter();

    let source = menu_scanner();
    source.set_control("Exposure, Auto", 1).unwrap();
    sync.save(&source, &mut store);
    assert_eq!(store.store().int(CAMERA_GROUP, "Exposure_Auto"), Some(1));

    let target = menu_scanner();
    sync.load(&target, &mut store);
    assert_eq!(target.control_value("Exposure, Auto"), Some(1));
}

#[test]
fn test_colliding_names_share_a_key() {
    assert_eq!(control_key("Foo Bar"), control_key("Foo_Bar"));

    let sync = Synchronizer::default();
    let mut store = memory_adapter();
    let report = sync.save(&colliding_scanner(), &mut store);

    // Both controls write the same key; the later one wins.
    let persisted: Vec<_> = report
        .entries
        .iter()
        .filter(|e| e.group == CAMERA_GROUP && e.outcome == Outcome::Persisted)
        .collect();
    assert_eq!(persisted.len(), 2);
    assert_eq!(store.store().keys(CAMERA_GROUP), vec!["Foo_Bar"]);
    assert_eq!(store.store().int(CAMERA_GROUP, "Foo_Bar"), Some(20));

    let target = colliding_scanner();
    sync.load(&target, &mut store);
    assert_eq!(target.control_value("Foo Bar"), Some(20));
    assert_eq!(target.control_value("Foo_Bar"), Some(20));
}

#[test]
fn test_load_order_matches_save_order() {
    let sync = Synchronizer::default();
    let mut store = memory_adapter();
    let device = MockDevice::webcam();

    let saved = sync.save(&device, &mut store);
    let loaded = sync.load(&device, &mut store);

    let saved_keys: Vec<_> = saved.entries.iter().map(|e| (e.group, e.key.clone())).collect();
    let loaded_keys: Vec<_> = loaded.entries.iter().map(|e| (e.group, e.key.clone())).collect();
    assert_eq!(saved_keys, loaded_keys);
}
