//! Device lifecycle: startup, enable, disable, edit, shutdown.
//!
//! ```text
//! startup ─► load
//! enable  ─► load, rebuild model
//! disable ─► save, drop model
//! shutdown ─► save, flush store
//! ```
//!
//! The model is always rebuilt from scratch on enable, since the device may
//! expose a different control set after coming back.

use tracing::{debug, info, instrument};

use super::{ControlEdit, ControlModel, SyncEntry, SyncReport, Synchronizer};
use crate::device::DeviceOperations;
use crate::error::{Result, ScanError};
use crate::store::{ConfigStore, StoreAdapter};

/// One device bound to one settings store.
pub struct Session<'a, D: ?Sized, S> {
    sync: Synchronizer,
    device: &'a D,
    store: StoreAdapter<S>,
    model: Option<ControlModel>,
}

impl<'a, D, S> Session<'a, D, S>
where
    D: DeviceOperations + ?Sized,
    S: ConfigStore,
{
    pub fn new(sync: Synchronizer, device: &'a D, store: StoreAdapter<S>) -> Self {
        Self {
            sync,
            device,
            store,
            model: None,
        }
    }

    /// Apply stored settings once at program start.
    #[instrument(skip_all)]
    pub fn startup(&mut self) -> SyncReport {
        info!(device = self.device.name(), "Session starting");
        self.sync.load(self.device, &mut self.store)
    }

    /// Device turned on: re-apply stored values, then rebuild the model.
    #[instrument(skip_all)]
    pub fn enable(&mut self) -> SyncReport {
        if self.model.take().is_some() {
            debug!("Discarding previous control model");
        }
        let report = self.sync.load(self.device, &mut self.store);
        self.model = Some(self.sync.resolve_model(self.device));
        report
    }

    /// Device turned off: persist its state and tear the model down.
    #[instrument(skip_all)]
    pub fn disable(&mut self) -> SyncReport {
        let report = self.sync.save(self.device, &mut self.store);
        self.model = None;
        report
    }

    /// Apply one user change.
    ///
    /// Decoder settings can be edited at any time; device controls only
    /// while the device is enabled.
    pub fn edit(&mut self, edit: &ControlEdit) -> Result<SyncEntry> {
        if matches!(edit, ControlEdit::Control { .. }) && self.model.is_none() {
            return Err(ScanError::DeviceDisabled);
        }
        let entry = self.sync.apply_edit(self.device, &mut self.store, edit)?;
        if self.model.is_some() {
            self.model = Some(self.sync.resolve_model(self.device));
        }
        Ok(entry)
    }

    /// Save the device state and flush the store.
    #[instrument(skip_all)]
    pub fn shutdown(mut self) -> (SyncReport, StoreAdapter<S>) {
        let report = self.sync.save(self.device, &mut self.store);
        self.store.flush();
        info!(device = self.device.name(), "Session closed");
        (report, self.store)
    }

    pub const fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// Resolved model; `None` while disabled.
    pub const fn model(&self) -> Option<&ControlModel> {
        self.model.as_ref()
    }

    pub const fn store(&self) -> &StoreAdapter<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::MockDevice;
    use crate::store::MemoryStore;
    use crate::sync::{CAMERA_GROUP, Outcome};

    fn session(device: &MockDevice) -> Session<'_, MockDevice, MemoryStore> {
        Session::new(
            Synchronizer::default(),
            device,
            StoreAdapter::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_enable_builds_model() {
        let device = MockDevice::webcam();
        let mut session = session(&device);
        session.startup();
        assert!(!session.is_enabled());

        session.enable();
        assert!(session.is_enabled());
        assert!(session.model().unwrap().control("Auto Focus").is_some());

        session.disable();
        assert!(session.model().is_none());
    }

    #[test]
    fn test_control_edit_requires_enabled() {
        let device = MockDevice::webcam();
        let mut session = session(&device);
        let edit = ControlEdit::Control {
            name: "Auto Focus".to_string(),
            value: 1,
        };

        assert!(matches!(session.edit(&edit), Err(ScanError::DeviceDisabled)));
        session.enable();
        let entry = session.edit(&edit).unwrap();
        assert_eq!(entry.outcome, Outcome::Persisted);
        assert_eq!(
            session.model().unwrap().control("Auto Focus").unwrap().value,
            Some(1)
        );
    }

    #[test]
    fn test_shutdown_saves() {
        let device = MockDevice::webcam();
        let mut session = session(&device);
        session.enable();
        let (report, store) = session.shutdown();

        assert!(report.entry(CAMERA_GROUP, "Brightness").is_some());
        assert_eq!(store.store().int(CAMERA_GROUP, "Contrast"), Some(32));
    }
}
