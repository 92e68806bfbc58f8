//! Unavailable and rejected controls never abort a pass.

use scanctl::catalog::{Catalog, DecoderSetting, Symbology};
use scanctl::device::mock::{MockDevice, MockDeviceBuilder, Operation};
use scanctl::error::ScanError;
use scanctl::sync::{CAMERA_GROUP, ControlEdit, Outcome, SYMBOLOGY_GROUP, Synchronizer};

use crate::common::fixtures::memory_adapter;

#[test]
fn test_aggregate_settings_never_touched() {
    let device = MockDevice::webcam();
    let mut store = memory_adapter();
    let sync = Synchronizer::default();
    sync.load(&device, &mut store);
    sync.save(&device, &mut store);
    sync.resolve_model(&device);

    let aggregate = Catalog::builtin()
        .symbologies()
        .iter()
        .find(|entry| entry.aggregate)
        .unwrap();
    for op in device.operations() {
        let touched = match op {
            Operation::GetConfig { symbology, setting }
            | Operation::SetConfig {
                symbology, setting, ..
            } => (symbology == aggregate.symbology).then_some(setting),
            _ => None,
        };
        if let Some(setting) = touched {
            assert_eq!(setting, DecoderSetting::Enable);
        }
    }
    assert!(
        store
            .store()
            .keys(SYMBOLOGY_GROUP)
            .iter()
            .filter(|key| key.starts_with("Composite_codes."))
            .all(|key| key == "Composite_codes.enable")
    );
}

#[cfg(feature = "qrcode")]
#[test]
fn test_unavailable_enable_skips_symbology_on_save() {
    let device = MockDeviceBuilder::new()
        .failing_config(Symbology::QrCode, DecoderSetting::Enable)
        .build();
    let mut store = memory_adapter();

    let report = Synchronizer::default().save(&device, &mut store);

    assert!(store.store().keys(SYMBOLOGY_GROUP).iter().all(|key| !key.starts_with("QR_code.")));
    assert_eq!(
        report.entry(SYMBOLOGY_GROUP, "QR_code.enable").map(|e| e.outcome),
        Some(Outcome::Skipped)
    );
    device.assert_not_contains(&Operation::GetConfig {
        symbology: Symbology::QrCode,
        setting: DecoderSetting::Position,
    });
}

#[cfg(feature = "qrcode")]
#[test]
fn test_unsupported_setting_left_in_store() {
    let device = MockDevice::new();
    let mut store = memory_adapter();
    store.set(SYMBOLOGY_GROUP, "QR_code.min-length", 7);

    let sync = Synchronizer::default();
    let load = sync.load(&device, &mut store);
    let save = sync.save(&device, &mut store);

    assert_eq!(
        load.entry(SYMBOLOGY_GROUP, "QR_code.min-length").map(|e| e.outcome),
        Some(Outcome::Skipped)
    );
    assert_eq!(
        save.entry(SYMBOLOGY_GROUP, "QR_code.min-length").map(|e| e.outcome),
        Some(Outcome::Skipped)
    );
    assert_eq!(store.store().int(SYMBOLOGY_GROUP, "QR_code.min-length"), Some(7));
}

#[test]
fn test_read_failure_skips_without_store_access() {
    let device = MockDeviceBuilder::webcam().failing_read("Contrast").build();
    let mut store = memory_adapter();
    store.set(CAMERA_GROUP, "Contrast", 80);

    let sync = Synchronizer::default();
    let load = sync.load(&device, &mut store);
    let save = sync.save(&device, &mut store);

    assert_eq!(device.control_value("Contrast"), Some(32));
    assert_eq!(store.store().int(CAMERA_GROUP, "Contrast"), Some(80));
    assert_eq!(
        load.entry(CAMERA_GROUP, "Contrast").map(|e| e.outcome),
        Some(Outcome::Skipped)
    );
    assert_eq!(
        save.entry(CAMERA_GROUP, "Contrast").map(|e| e.outcome),
        Some(Outcome::Skipped)
    );
}

#[test]
fn test_out_of_range_stored_value_is_rejected() {
    let device = MockDevice::webcam();
    let mut store = memory_adapter();
    store.set(CAMERA_GROUP, "Exposure_Absolute", 99_999);
    store.set(CAMERA_GROUP, "Power_Line_Frequency", 7);

    let report = Synchronizer::default().load(&device, &mut store);

    let summary = report.summary();
    assert_eq!(summary.rejected, 2);
    assert!(summary.applied > 0);
    assert_eq!(device.control_value("Exposure (Absolute)"), Some(156));
    assert_eq!(device.control_value("Power Line Frequency"), Some(1));
}

#[test]
fn test_failed_batch_keeps_earlier_edits() {
    let device = MockDevice::webcam();
    let mut store = memory_adapter();

    let result = Synchronizer::default().apply_edits(
        &device,
        &mut store,
        &[
            ControlEdit::Control {
                name: "Brightness".to_string(),
                value: 5,
            },
            ControlEdit::Control {
                name: "Tilt".to_string(),
                value: 1,
            },
            ControlEdit::Control {
                name: "Contrast".to_string(),
                value: 6,
            },
        ],
    );

    assert!(matches!(result, Err(ScanError::UnknownControl { ref name }) if name == "Tilt"));
    assert_eq!(store.store().int(CAMERA_GROUP, "Brightness"), Some(5));
    assert_eq!(store.store().int(CAMERA_GROUP, "Contrast"), None);
}

#[test]
fn test_rejected_edit_not_persisted() {
    let device = MockDeviceBuilder::webcam().rejecting_write("Brightness").build();
    let mut store = memory_adapter();

    let err = Synchronizer::default()
        .apply_edit(
            &device,
            &mut store,
            &ControlEdit::Control {
                name: "Brightness".to_string(),
                value: 5,
            },
        )
        .unwrap_err();

    assert!(matches!(err, ScanError::ControlRejected { value: 5, .. }));
    assert!(store.store().is_empty());
}
