//! w1therm - DS18B20 temperature sensors over the Linux 1-Wire bus.
//!
//! This library provides the pieces shared by the `w1thermd` daemon and
//! any other consumer:
//! - `sensor` - discovery, probes, probe groups, bus bootstrap
//! - `temperature` - the temperature value type
//! - `config` - bus locations and module names

pub mod config;
pub mod sensor;
pub mod temperature;

pub use config::BusConfig;
pub use sensor::{ProbeError, ProbeGroup};
pub use temperature::Temperature;
