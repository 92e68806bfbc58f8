//! Static catalog of decoder symbologies and their per-symbology settings.
//!
//! Entries are fixed at compile time; symbologies behind a disabled Cargo
//! feature are absent from [`Catalog::builtin`]. The catalog is handed to the
//! synchronizer by value so tests can substitute their own tables.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, ScanError};

/// Barcode formats known to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symbology {
    Composite,
    Codabar,
    Code128,
    I25,
    Code39,
    Code93,
    Databar,
    DatabarExp,
    Ean2,
    Ean5,
    Ean8,
    Ean13,
    Isbn10,
    Isbn13,
    Upca,
    Upce,
    Pdf417,
    QrCode,
    SqCode,
}

impl Symbology {
    /// Whether support for this symbology was compiled into the decoder.
    pub const fn is_compiled_in(self) -> bool {
        match self {
            Self::Composite => true,
            Self::Codabar => cfg!(feature = "codabar"),
            Self::Code128 => cfg!(feature = "code128"),
            Self::I25 => cfg!(feature = "i25"),
            Self::Code39 => cfg!(feature = "code39"),
            Self::Code93 => cfg!(feature = "code93"),
            Self::Databar | Self::DatabarExp => cfg!(feature = "databar"),
            Self::Ean2
            | Self::Ean5
            | Self::Ean8
            | Self::Ean13
            | Self::Isbn10
            | Self::Isbn13
            | Self::Upca
            | Self::Upce => cfg!(feature = "ean"),
            Self::Pdf417 => cfg!(feature = "pdf417"),
            Self::QrCode => cfg!(feature = "qrcode"),
            Self::SqCode => cfg!(feature = "sqcode"),
        }
    }

    /// Two-dimensional codes have no length or uncertainty checks.
    pub const fn is_2d(self) -> bool {
        matches!(self, Self::QrCode | Self::SqCode | Self::Pdf417)
    }

    /// Members of the EAN/UPC family have fixed lengths.
    pub const fn is_ean_family(self) -> bool {
        matches!(
            self,
            Self::Ean2
                | Self::Ean5
                | Self::Ean8
                | Self::Ean13
                | Self::Isbn10
                | Self::Isbn13
                | Self::Upca
                | Self::Upce
        )
    }
}

/// Decoder-side tunables, addressed per symbology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecoderSetting {
    Enable,
    XDensity,
    YDensity,
    MinLength,
    MaxLength,
    Uncertainty,
    Ascii,
    AddCheck,
    EmitCheck,
    Position,
}

/// How a setting's integer value should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    Integer,
}

/// A symbology as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbologyEntry {
    pub name: &'static str,
    pub symbology: Symbology,
    /// Composite of other symbologies; only the enable flag applies.
    pub aggregate: bool,
}

impl SymbologyEntry {
    const fn new(name: &'static str, symbology: Symbology) -> Self {
        Self {
            name,
            symbology,
            aggregate: false,
        }
    }

    const fn aggregate(name: &'static str, symbology: Symbology) -> Self {
        Self {
            name,
            symbology,
            aggregate: true,
        }
    }
}

impl fmt::Display for SymbologyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A per-symbology decoder setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingEntry {
    pub name: &'static str,
    pub setting: DecoderSetting,
    pub kind: ValueKind,
}

impl SettingEntry {
    const fn integer(name: &'static str, setting: DecoderSetting) -> Self {
        Self {
            name,
            setting,
            kind: ValueKind::Integer,
        }
    }

    const fn boolean(name: &'static str, setting: DecoderSetting) -> Self {
        Self {
            name,
            setting,
            kind: ValueKind::Boolean,
        }
    }
}

/// Name used for the enable flag on the command line and in keys.
pub const ENABLE_SETTING_NAME: &str = "enable";

static SYMBOLOGIES: &[SymbologyEntry] = &[
    SymbologyEntry::aggregate("Composite codes", Symbology::Composite),
    #[cfg(feature = "codabar")]
    SymbologyEntry::new("Codabar", Symbology::Codabar),
    #[cfg(feature = "code128")]
    SymbologyEntry::new("Code-128", Symbology::Code128),
    #[cfg(feature = "i25")]
    SymbologyEntry::new("Code 2 of 5 interlaced", Symbology::I25),
    #[cfg(feature = "code39")]
    SymbologyEntry::new("Code-39", Symbology::Code39),
    #[cfg(feature = "code93")]
    SymbologyEntry::new("Code-93", Symbology::Code93),
    #[cfg(feature = "databar")]
    SymbologyEntry::new("DataBar", Symbology::Databar),
    #[cfg(feature = "databar")]
    SymbologyEntry::new("DataBar expanded", Symbology::DatabarExp),
    #[cfg(feature = "ean")]
    SymbologyEntry::new("EAN-2", Symbology::Ean2),
    #[cfg(feature = "ean")]
    SymbologyEntry::new("EAN-5", Symbology::Ean5),
    #[cfg(feature = "ean")]
    SymbologyEntry::new("EAN-8", Symbology::Ean8),
    #[cfg(feature = "ean")]
    SymbologyEntry::new("EAN-13", Symbology::Ean13),
    #[cfg(feature = "ean")]
    SymbologyEntry::new("ISBN-10", Symbology::Isbn10),
    #[cfg(feature = "ean")]
    SymbologyEntry::new("ISBN-13", Symbology::Isbn13),
    #[cfg(feature = "ean")]
    SymbologyEntry::new("UPC-A", Symbology::Upca),
    #[cfg(feature = "ean")]
    SymbologyEntry::new("UPC-E", Symbology::Upce),
    #[cfg(feature = "pdf417")]
    SymbologyEntry::new("PDF417", Symbology::Pdf417),
    #[cfg(feature = "qrcode")]
    SymbologyEntry::new("QR code", Symbology::QrCode),
    #[cfg(feature = "sqcode")]
    SymbologyEntry::new("SQ code", Symbology::SqCode),
];

static SETTINGS: &[SettingEntry] = &[
    SettingEntry::integer("x-density", DecoderSetting::XDensity),
    SettingEntry::integer("y-density", DecoderSetting::YDensity),
    SettingEntry::integer("min-length", DecoderSetting::MinLength),
    SettingEntry::integer("max-length", DecoderSetting::MaxLength),
    SettingEntry::integer("uncertainty", DecoderSetting::Uncertainty),
    SettingEntry::boolean("ascii", DecoderSetting::Ascii),
    SettingEntry::boolean("add-check", DecoderSetting::AddCheck),
    SettingEntry::boolean("emit-check", DecoderSetting::EmitCheck),
    SettingEntry::boolean("position", DecoderSetting::Position),
];

/// Read-only view over the symbology and setting tables.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    symbologies: &'static [SymbologyEntry],
    settings: &'static [SettingEntry],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The tables compiled into this build.
    pub const fn builtin() -> Self {
        Self {
            symbologies: SYMBOLOGIES,
            settings: SETTINGS,
        }
    }

    /// A catalog over caller-provided tables.
    pub const fn new(
        symbologies: &'static [SymbologyEntry],
        settings: &'static [SettingEntry],
    ) -> Self {
        Self {
            symbologies,
            settings,
        }
    }

    pub const fn symbologies(&self) -> &'static [SymbologyEntry] {
        self.symbologies
    }

    pub const fn settings(&self) -> &'static [SettingEntry] {
        self.settings
    }

    /// Settings that apply to `entry`; empty for aggregates.
    pub fn settings_for(&self, entry: &SymbologyEntry) -> &'static [SettingEntry] {
        if entry.aggregate { &[] } else { self.settings }
    }

    /// Look up a symbology by display name (case-insensitive).
    pub fn find_symbology(&self, name: &str) -> Result<&'static SymbologyEntry> {
        self.symbologies
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ScanError::UnknownSymbology {
                name: name.to_string(),
            })
    }

    /// Look up the catalog entry for a decoder symbology.
    pub fn entry_for(&self, symbology: Symbology) -> Result<&'static SymbologyEntry> {
        self.symbologies
            .iter()
            .find(|entry| entry.symbology == symbology)
            .ok_or_else(|| ScanError::UnknownSymbology {
                name: format!("{symbology:?}"),
            })
    }

    /// Look up a setting by display name.
    pub fn find_setting(&self, name: &str) -> Result<&'static SettingEntry> {
        self.settings
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ScanError::UnknownSetting {
                name: name.to_string(),
            })
    }

    /// Look up the catalog entry for a decoder setting.
    pub fn setting_entry(&self, setting: DecoderSetting) -> Result<&'static SettingEntry> {
        self.settings
            .iter()
            .find(|entry| entry.setting == setting)
            .ok_or_else(|| ScanError::UnknownSetting {
                name: format!("{setting:?}"),
            })
    }
}
