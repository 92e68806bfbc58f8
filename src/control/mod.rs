//! Runtime-discovered device controls.
//!
//! Devices report controls as [`RawControl`] records; the enumerator turns
//! them into classified [`ControlDescriptor`]s.

mod enumerator;

pub use enumerator::{Controls, controls, enumerate};

use serde::Serialize;

/// Control type code as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Integer,
    Integer64,
    Boolean,
    Menu,
    IntegerMenu,
    Button,
    /// Anything this crate does not know how to handle.
    Other(String),
}

/// One entry of a device's control table, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawControl {
    pub name: String,
    pub group: String,
    pub typ: ControlType,
    pub minimum: i64,
    pub maximum: i64,
    pub default: i64,
    pub step: i64,
}

impl RawControl {
    pub fn new(name: impl Into<String>, group: impl Into<String>, typ: ControlType) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            typ,
            minimum: 0,
            maximum: 0,
            default: 0,
            step: 1,
        }
    }

    #[must_use]
    pub fn range(mut self, minimum: i64, maximum: i64, step: i64) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self.step = step;
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: i64) -> Self {
        self.default = default;
        self
    }
}

/// One option of an enumerated control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub value: i64,
    pub label: String,
}

impl MenuItem {
    pub fn new(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Classified control kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
    Boolean {
        default: bool,
    },
    Integer {
        min: i64,
        max: i64,
        default: i64,
        step: i64,
    },
    Menu {
        default: i64,
        options: Vec<MenuItem>,
    },
    /// Momentary action; has no steady-state value.
    Button,
    /// Unknown to this crate; carried so indices stay aligned, otherwise ignored.
    Unsupported {
        typ: String,
    },
}

impl ControlKind {
    /// Whether values of this kind are written to the settings store.
    pub const fn is_persistent(&self) -> bool {
        matches!(
            self,
            Self::Boolean { .. } | Self::Integer { .. } | Self::Menu { .. }
        )
    }

    /// Fallback value when the device cannot report the current one.
    pub fn default_value(&self) -> Option<i64> {
        match self {
            Self::Boolean { default } => Some(i64::from(*default)),
            Self::Integer { default, .. } => Some(*default),
            // Menus fall back to the first raw value, not the declared default.
            Self::Menu { .. } => Some(0),
            Self::Button | Self::Unsupported { .. } => None,
        }
    }
}

/// A control discovered on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlDescriptor {
    pub index: usize,
    pub name: String,
    pub group: String,
    #[serde(flatten)]
    pub kind: ControlKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_by_kind() {
        assert!(ControlKind::Boolean { default: true }.is_persistent());
        assert!(
            ControlKind::Integer {
                min: 0,
                max: 10,
                default: 5,
                step: 1
            }
            .is_persistent()
        );
        assert!(!ControlKind::Button.is_persistent());
        assert!(
            !ControlKind::Unsupported {
                typ: "string".to_string()
            }
            .is_persistent()
        );
    }

    #[test]
    fn test_default_values() {
        assert_eq!(ControlKind::Boolean { default: true }.default_value(), Some(1));
        let menu = ControlKind::Menu {
            default: 2,
            options: vec![MenuItem::new(1, "50 Hz"), MenuItem::new(2, "60 Hz")],
        };
        assert_eq!(menu.default_value(), Some(0));
        assert_eq!(ControlKind::Button.default_value(), None);
    }

    #[test]
    fn test_descriptor_serializes_flat() {
        let desc = ControlDescriptor {
            index: 3,
            name: "Auto Focus".to_string(),
            group: "Camera".to_string(),
            kind: ControlKind::Boolean { default: false },
        };
        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["kind"], "boolean");
        assert_eq!(json["name"], "Auto Focus");
        assert_eq!(json["default"], false);
    }
}
