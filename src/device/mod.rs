//! Device abstraction layer for camera controls and decoder configuration.
//!
//! A scanner is a camera (runtime-discovered controls addressed by name)
//! paired with a barcode decoder (per-symbology settings). Both sides are
//! reached through [`DeviceOperations`] so the synchronizer can run against
//! real hardware or [`mock::MockDevice`].

pub mod decoder;
pub mod mock;
#[cfg(target_os = "linux")]
mod v4l2;

pub use decoder::DecoderConfig;
#[cfg(target_os = "linux")]
pub use v4l2::V4l2Scanner;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::catalog::{DecoderSetting, Symbology};
use crate::control::{MenuItem, RawControl};
use crate::error::{ControlResult, Result};

/// Core scanner operations.
///
/// Every accessor may answer [`Unavailable`](crate::error::Unavailable);
/// callers treat that as "skip this control for now", never as fatal.
///
/// # Implementation Notes
///
/// - `control_at(0)` must re-read the device's control table
/// - Booleans travel as 0/1
/// - Menu values are the raw option values, not positions
pub trait DeviceOperations {
    /// Human-readable device name for logs.
    fn name(&self) -> &str;

    /// Current value of the named camera control.
    fn get_control(&self, name: &str) -> ControlResult<i64>;

    /// Set the named camera control.
    fn set_control(&self, name: &str, value: i64) -> ControlResult<()>;

    /// Current value of a decoder setting for one symbology.
    fn get_config(&self, symbology: Symbology, setting: DecoderSetting) -> ControlResult<i64>;

    /// Set a decoder setting for one symbology.
    fn set_config(
        &self,
        symbology: Symbology,
        setting: DecoderSetting,
        value: i64,
    ) -> ControlResult<()>;

    /// Raw description of the control at `index`, `None` past the end.
    fn control_at(&self, index: usize) -> Option<RawControl>;

    /// Ordered options of the menu control at `index`.
    fn menu(&self, index: usize) -> Vec<MenuItem>;
}

/// Type alias for boxed trait object.
pub type BoxedDevice = Box<dyn DeviceOperations>;

/// Open the camera at `path` together with a fresh decoder.
#[cfg(target_os = "linux")]
pub fn open_device(path: &Path) -> Result<BoxedDevice> {
    Ok(Box::new(V4l2Scanner::open(path)?))
}

#[cfg(not(target_os = "linux"))]
pub fn open_device(path: &Path) -> Result<BoxedDevice> {
    Err(crate::error::ScanError::DeviceOpenFailed {
        path: path.display().to_string(),
        reason: "V4L2 cameras are only supported on Linux".to_string(),
    })
}

/// List `video*` device nodes in `dir`, sorted.
///
/// An unreadable directory yields an empty list.
pub fn list_video_devices(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Cannot read device directory");
            return Vec::new();
        }
    };

    let mut devices: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("video"))
        })
        .collect();
    devices.sort();
    debug!(count = devices.len(), dir = %dir.display(), "Found video devices");
    devices
}
