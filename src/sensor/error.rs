//! Error type shared by discovery, probes and probe groups.

use std::fmt;
use std::io;

/// Error type for sensor failures.
#[derive(Debug)]
pub enum ProbeError {
    /// Operation attempted on a closed probe or group.
    Closed,
    /// No probe with the given ID or alias.
    NotFound(String),
    /// No 1-Wire bus master entry exists.
    NoBusPresent,
    /// Discovery returned no sensors.
    NoSensorsFound,
    /// The report's integrity marker was not `YES`.
    Crc(String),
    /// The report's temperature line has no single `t=` field.
    Format(String),
    /// The `t=` payload is not a valid integer.
    Parse(String),
    /// I/O error reading the bus.
    Io(io::Error),
}

impl ProbeError {
    /// Returns `true` for errors caused by using a closed probe or group.
    pub fn is_closed(&self) -> bool {
        matches!(self, ProbeError::Closed)
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Closed => write!(f, "closed"),
            ProbeError::NotFound(key) => write!(f, "probe not found: {}", key),
            ProbeError::NoBusPresent => write!(f, "1-Wire master bus not present"),
            ProbeError::NoSensorsFound => write!(f, "no sensors found"),
            ProbeError::Crc(line) => write!(f, "CRC check failed: {:?}", line),
            ProbeError::Format(line) => write!(f, "malformed temperature line: {:?}", line),
            ProbeError::Parse(msg) => write!(f, "parse error: {}", msg),
            ProbeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProbeError {
    fn from(e: io::Error) -> Self {
        ProbeError::Io(e)
    }
}
