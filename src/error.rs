//! Error types for scanctl operations.

use thiserror::Error;

/// Primary error type for scanctl operations.
#[derive(Error, Debug)]
pub enum ScanError {
    // Device errors
    #[error("Video device not found: {path}")]
    DeviceNotFound { path: String },

    #[error("Failed to open video device '{path}': {reason}")]
    DeviceOpenFailed { path: String, reason: String },

    #[error("Device controls are unavailable while the device is disabled")]
    DeviceDisabled,

    #[error("Unknown control: {name}")]
    UnknownControl { name: String },

    #[error("Control '{name}' rejected value {value}: {reason}")]
    ControlRejected {
        name: String,
        value: i64,
        reason: String,
    },

    // Catalog errors
    #[error("Unknown symbology: {name}")]
    UnknownSymbology { name: String },

    #[error("Unknown decoder setting: {name}")]
    UnknownSetting { name: String },

    #[error("Symbology '{name}' has no per-symbology settings")]
    AggregateHasNoSettings { name: String },

    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },

    // Store errors
    #[error("Failed to open settings store '{path}': {reason}")]
    StoreOpenFailed { path: String, reason: String },

    #[error("Settings store error: {0}")]
    Store(String),

    #[error("Settings file parse error: {0}")]
    ConfigParse(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ScanError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotFound { .. }
                | Self::UnknownControl { .. }
                | Self::UnknownSymbology { .. }
                | Self::UnknownSetting { .. }
                | Self::AggregateHasNoSettings { .. }
                | Self::InvalidValue { .. }
                | Self::ConfigParse(_)
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::DeviceNotFound { .. } => {
                Some("Run: scanctl devices, or use --mock to try without a camera")
            }
            Self::UnknownControl { .. } => Some("Run: scanctl controls"),
            Self::UnknownSymbology { .. } | Self::UnknownSetting { .. } => {
                Some("Run: scanctl catalog")
            }
            Self::ConfigParse(_) => Some("Fix or remove the settings file"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using ScanError.
pub type Result<T> = std::result::Result<T, ScanError>;

/// A device or decoder refused a single control access.
///
/// Sync passes treat this as "temporarily unavailable" and skip the key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct Unavailable {
    pub reason: String,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Result of a single control or decoder access.
pub type ControlResult<T> = std::result::Result<T, Unavailable>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions() {
        let err = ScanError::UnknownSymbology {
            name: "Code-11".to_string(),
        };
        assert!(err.is_user_recoverable());
        assert_eq!(err.suggestion(), Some("Run: scanctl catalog"));

        let err = ScanError::Store("disk full".to_string());
        assert!(!err.is_user_recoverable());
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn test_unavailable_display() {
        let err = Unavailable::new("control busy");
        assert_eq!(err.to_string(), "control busy");

        let boxed: Box<dyn std::error::Error> = Box::new(err.clone());
        assert_eq!(boxed.to_string(), err.reason);
    }
}
