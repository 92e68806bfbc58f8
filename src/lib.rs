//! scanctl library - control discovery and persistent settings sync for
//! barcode scanners.
//!
//! This library exposes the core of the `scanctl` CLI for use in tests and
//! other front ends.
//!
//! # Modules
//!
//! - `catalog`: Symbologies and per-symbology decoder settings
//! - `control`: Runtime-discovered device controls and their enumeration
//! - `device`: Device abstraction layer (V4L2, mock)
//! - `sanitize`: Store key derivation
//! - `store`: Settings persistence backends
//! - `sync`: Load/save passes, edits, and the device lifecycle
//! - `output`: Output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod control;
pub mod device;
pub mod error;
pub mod logging;
pub mod output;
pub mod sanitize;
pub mod store;
pub mod sync;
pub mod theme;
