//! DS18B20 sensors on the Linux 1-Wire bus.
//!
//! The w1-therm driver exposes each sensor as a symlinked directory under
//! `/sys/bus/w1/devices` holding a `w1_slave` report file.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     ProbeGroup                       │
//! │   group lock ── BTreeMap<id, Probe>                  │
//! │                    │                                 │
//! │             ┌──────▼──────┐     ┌────────────────┐   │
//! │             │    Probe    │────▶│ parse_report   │   │
//! │             │ probe lock  │     └────────────────┘   │
//! │             └──────┬──────┘                          │
//! │  discovery::slaves │                                 │
//! │             ┌──────▼──────┐                          │
//! │             │  FileSystem │ (trait)                  │
//! │             └──────┬──────┘                          │
//! └────────────────────┼─────────────────────────────────┘
//!              ┌───────┴───────┐
//!       ┌──────▼──────┐ ┌──────▼──────┐
//!       │   RealFs    │ │   MockFs    │
//!       │  (Linux)    │ │  (Testing)  │
//!       └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use w1therm::sensor::{ProbeGroup, RealFs};
//! use w1therm::BusConfig;
//!
//! let group = ProbeGroup::create(&RealFs::new(), &BusConfig::default())?;
//! group.update()?;
//! for (id, temperature) in group.read()? {
//!     println!("{id}: {temperature}");
//! }
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use w1therm::sensor::{MockFs, ProbeGroup};
//! use w1therm::BusConfig;
//!
//! let fs = MockFs::typical_bus();
//! let group = ProbeGroup::create(&fs, &BusConfig::default()).unwrap();
//! group.update().unwrap();
//! assert_eq!(group.read().unwrap().len(), 3);
//! ```

pub mod bus;
pub mod discovery;
mod error;
mod group;
pub mod mock;
pub mod parser;
mod probe;
pub mod traits;

pub use bus::{Modprobe, ModuleLoader, setup};
pub use discovery::{master_present, slaves};
pub use error::ProbeError;
pub use group::{ProbeGroup, Readings};
pub use mock::MockFs;
pub use probe::Probe;
pub use traits::{FileSystem, RealFs, SensorSource};
