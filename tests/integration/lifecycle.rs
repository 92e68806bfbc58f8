//! Device lifecycle: startup, enable, disable, shutdown.

use scanctl::catalog::{DecoderSetting, Symbology};
use scanctl::control::{controls, enumerate};
use scanctl::device::DeviceOperations;
use scanctl::device::mock::{MockDevice, Operation};
use scanctl::error::ScanError;
use scanctl::sync::{
    CAMERA_GROUP, ControlEdit, Direction, Outcome, SYMBOLOGY_GROUP, Session, Synchronizer,
};

use crate::common::fixtures::{memory_adapter, replacement_controls};

#[test]
fn test_enable_rebuilds_after_control_set_changes() {
    let device = MockDevice::webcam();
    let mut session = Session::new(Synchronizer::default(), &device, memory_adapter());

    session.startup();
    session.enable();
    assert!(session.model().unwrap().control("Auto Focus").is_some());

    session.disable();
    device.replace_controls(replacement_controls());
    session.enable();

    let model = session.model().unwrap();
    assert!(model.control("Auto Focus").is_none());
    assert!(model.control("Zoom, Absolute").is_some());
    assert_eq!(model.control_count(), 2);
    assert_eq!(model.groups.len(), 1);
}

#[test]
fn test_enumeration_restarts_from_scratch() {
    let device = MockDevice::webcam();
    let before: Vec<_> = controls(&device).map(|d| d.name).collect();
    assert_eq!(before.len(), 9);
    assert!(enumerate(&device, before.len()).is_none());
    assert!(enumerate(&device, 1000).is_none());

    device.replace_controls(replacement_controls());
    let after: Vec<_> = controls(&device).map(|d| d.name).collect();
    assert_eq!(after, vec!["Zoom, Absolute", "Privacy"]);
}

#[test]
fn test_disable_saves_current_state() {
    let device = MockDevice::webcam();
    let mut session = Session::new(Synchronizer::default(), &device, memory_adapter());
    session.enable();

    session
        .edit(&ControlEdit::Control {
            name: "Brightness".to_string(),
            value: 30,
        })
        .unwrap();
    let report = session.disable();

    assert_eq!(report.direction, Direction::Save);
    assert_eq!(session.store().store().int(CAMERA_GROUP, "Brightness"), Some(30));
    assert!(!session.is_enabled());
}

#[test]
fn test_symbology_edit_allowed_while_disabled() {
    let device = MockDevice::new();
    let mut session = Session::new(Synchronizer::default(), &device, memory_adapter());

    let entry = session
        .edit(&ControlEdit::SymbologyEnabled {
            symbology: scanctl::catalog::Symbology::Composite,
            enabled: true,
        })
        .unwrap();
    assert_eq!(entry.key.as_str(), "Composite_codes.enable");

    let err = session
        .edit(&ControlEdit::Control {
            name: "Brightness".to_string(),
            value: 1,
        })
        .unwrap_err();
    assert!(matches!(err, ScanError::DeviceDisabled));
}

#[test]
fn test_second_session_restores_first() {
    let device = MockDevice::webcam();
    let mut first = Session::new(Synchronizer::default(), &device, memory_adapter());
    first.enable();
    first
        .edit(&ControlEdit::Control {
            name: "Auto_Focus".to_string(),
            value: 1,
        })
        .unwrap();
    let (_, store) = first.shutdown();

    let fresh = MockDevice::webcam();
    let mut second = Session::new(Synchronizer::default(), &fresh, store);
    second.startup();
    assert_eq!(fresh.control_value("Auto Focus"), Some(1));
    fresh.assert_contains(&Operation::SetControl {
        name: "Auto Focus".to_string(),
        value: 1,
    });
}

#[test]
fn test_controls_lost_while_enabled() {
    let device = MockDevice::webcam();
    let mut session = Session::new(Synchronizer::default(), &device, memory_adapter());
    session.enable();
    session
        .edit(&ControlEdit::Control {
            name: "Contrast".to_string(),
            value: 70,
        })
        .unwrap();

    device.fail_reads("Contrast");
    device.reject_writes("Brightness");
    device.fail_config(Symbology::Composite, DecoderSetting::Enable);

    let err = session
        .edit(&ControlEdit::Control {
            name: "Brightness".to_string(),
            value: 5,
        })
        .unwrap_err();
    assert!(matches!(err, ScanError::ControlRejected { value: 5, .. }));

    let report = session.disable();
    assert_eq!(
        report.entry(CAMERA_GROUP, "Contrast").map(|e| e.outcome),
        Some(Outcome::Skipped)
    );
    assert_eq!(
        report.entry(SYMBOLOGY_GROUP, "Composite_codes.enable").map(|e| e.outcome),
        Some(Outcome::Skipped)
    );
    let store = session.store().store();
    assert_eq!(store.int(CAMERA_GROUP, "Contrast"), Some(70));
    assert_eq!(store.int(CAMERA_GROUP, "Brightness"), Some(0));
    assert_eq!(store.int(SYMBOLOGY_GROUP, "Composite_codes.enable"), None);

    device.clear_failures();
    device.set_control("Contrast", 10).unwrap();
    session.enable();
    assert_eq!(device.control_value("Contrast"), Some(70));
}
