//! Derivation of persistence keys from human-readable names.
//!
//! Load and save both go through these functions, so a key written by one
//! pass is exactly the key read by the next.
//!
//! Two names can map to the same key: `"Foo Bar"` and `"Foo_Bar"` both become
//! `Foo_Bar`. Existing settings files depend on this mapping, so it is kept.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::catalog::{ENABLE_SETTING_NAME, SettingEntry, SymbologyEntry};

static NON_WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("static pattern"));

/// A store key for one control or setting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PersistedKey(String);

impl PersistedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PersistedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PersistedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Catalog rule: `<symbology>.<setting>` with spaces turned into underscores.
pub fn catalog_key(symbology: &str, setting: &str) -> PersistedKey {
    PersistedKey(format!("{symbology}.{setting}").replace(' ', "_"))
}

/// Key for a symbology's enable flag, e.g. `Code_2_of_5_interlaced.enable`.
pub fn enable_key(entry: &SymbologyEntry) -> PersistedKey {
    catalog_key(entry.name, ENABLE_SETTING_NAME)
}

/// Key for a per-symbology setting, e.g. `Code-39.min-length`.
pub fn setting_key(entry: &SymbologyEntry, setting: &SettingEntry) -> PersistedKey {
    catalog_key(entry.name, setting.name)
}

/// Device control rule: every run of non-word characters becomes a single
/// underscore, then one trailing underscore is dropped.
///
/// Word characters are ASCII letters, digits and `_`; any other codepoint
/// counts as a separator.
pub fn control_key(name: &str) -> PersistedKey {
    let mut key = NON_WORD_RUN.replace_all(name, "_").into_owned();
    if key.ends_with('_') {
        key.pop();
    }
    PersistedKey(key)
}
