//! In-process decoder configuration table.
//!
//! Holds the per-symbology settings a barcode decoder consults while
//! scanning. Symbologies that were not compiled in, and settings a symbology
//! does not support, answer [`Unavailable`].

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::catalog::{DecoderSetting, Symbology};
use crate::error::{ControlResult, Unavailable};

/// Per-symbology decoder settings with decoder defaults.
#[derive(Debug, Default)]
pub struct DecoderConfig {
    values: Mutex<BTreeMap<(Symbology, DecoderSetting), i64>>,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `symbology` accepts `setting` at all.
    pub const fn supports(symbology: Symbology, setting: DecoderSetting) -> bool {
        if !symbology.is_compiled_in() {
            return false;
        }
        match setting {
            DecoderSetting::Enable => true,
            _ if matches!(symbology, Symbology::Composite) => false,
            DecoderSetting::XDensity | DecoderSetting::YDensity | DecoderSetting::Position => {
                true
            }
            DecoderSetting::MinLength | DecoderSetting::MaxLength => {
                !symbology.is_2d() && !symbology.is_ean_family()
            }
            DecoderSetting::Uncertainty
            | DecoderSetting::Ascii
            | DecoderSetting::AddCheck
            | DecoderSetting::EmitCheck => !symbology.is_2d(),
        }
    }

    /// Value a freshly created decoder reports.
    pub const fn default_value(symbology: Symbology, setting: DecoderSetting) -> i64 {
        match setting {
            DecoderSetting::Enable => match symbology {
                Symbology::Composite | Symbology::Isbn10 | Symbology::Isbn13 => 0,
                _ => 1,
            },
            DecoderSetting::XDensity
            | DecoderSetting::YDensity
            | DecoderSetting::Position
            | DecoderSetting::AddCheck => 1,
            DecoderSetting::MinLength | DecoderSetting::MaxLength | DecoderSetting::Ascii => 0,
            DecoderSetting::Uncertainty => 2,
            DecoderSetting::EmitCheck => {
                if symbology.is_ean_family() {
                    1
                } else {
                    0
                }
            }
        }
    }

    /// Current value of `setting` for `symbology`.
    pub fn get(&self, symbology: Symbology, setting: DecoderSetting) -> ControlResult<i64> {
        Self::check(symbology, setting)?;
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values
            .get(&(symbology, setting))
            .copied()
            .unwrap_or_else(|| Self::default_value(symbology, setting)))
    }

    /// Store `value`; boolean settings are normalized to 0/1.
    pub fn set(&self, symbology: Symbology, setting: DecoderSetting, value: i64) -> ControlResult<()> {
        Self::check(symbology, setting)?;
        if value < 0 {
            return Err(Unavailable::new(format!(
                "{setting:?} does not accept negative value {value}"
            )));
        }
        let value = if is_flag(setting) {
            i64::from(value != 0)
        } else {
            value
        };
        trace!(?symbology, ?setting, value, "decoder config set");
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((symbology, setting), value);
        Ok(())
    }

    fn check(symbology: Symbology, setting: DecoderSetting) -> ControlResult<()> {
        if !symbology.is_compiled_in() {
            return Err(Unavailable::new(format!(
                "{symbology:?} support is not compiled in"
            )));
        }
        if !Self::supports(symbology, setting) {
            return Err(Unavailable::new(format!(
                "{symbology:?} has no {setting:?} setting"
            )));
        }
        Ok(())
    }
}

const fn is_flag(setting: DecoderSetting) -> bool {
    matches!(
        setting,
        DecoderSetting::Enable
            | DecoderSetting::Ascii
            | DecoderSetting::AddCheck
            | DecoderSetting::EmitCheck
            | DecoderSetting::Position
    )
}
