//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built bus scenarios for testing
//! probes without requiring access to a real 1-Wire sysfs tree.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
pub use scenarios::{DEVICES_PATH, report};
