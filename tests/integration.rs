//! Integration tests for scanctl.
//!
//! These tests drive the synchronizer end to end against the mock device
//! and real store backends.
//!
//! # Modules
//!
//! - `round_trip`: save followed by load restores values
//! - `lifecycle`: startup, enable, disable and shutdown
//! - `store_backends`: TOML and SQLite persistence across reopen
//! - `failure_semantics`: skipped and rejected controls

#[path = "common/mod.rs"]
mod common;

#[path = "integration/round_trip.rs"]
mod round_trip;

#[path = "integration/lifecycle.rs"]
mod lifecycle;

#[path = "integration/store_backends.rs"]
mod store_backends;

#[path = "integration/failure_semantics.rs"]
mod failure_semantics;
