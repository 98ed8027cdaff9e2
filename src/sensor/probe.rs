//! A single DS18B20 sensor and its cached reading.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::config::BusConfig;
use crate::sensor::error::ProbeError;
use crate::sensor::parser::parse_report;
use crate::sensor::traits::{FileSystem, SensorSource};
use crate::temperature::Temperature;

struct ProbeState {
    /// `None` once the probe has been closed.
    source: Option<Box<dyn SensorSource>>,
    current: Temperature,
}

/// One physical sensor: its open report file and last parsed temperature.
///
/// The cached value starts at 0 C and only changes on a successful
/// [`Probe::update`]. All methods take `&self`; an internal lock keeps the
/// cached value and the file handle consistent across threads.
pub struct Probe {
    id: String,
    alias: Option<String>,
    state: Mutex<ProbeState>,
}

impl Probe {
    /// Opens the report file of sensor `id`.
    pub fn open<F: FileSystem + ?Sized>(
        fs: &F,
        config: &BusConfig,
        id: impl Into<String>,
    ) -> Result<Self, ProbeError> {
        let id = id.into();
        let path = config.data_path(&id);
        let source = fs.open(&path)?;
        debug!("Opened probe {} at {}", id, path.display());
        Ok(Self::from_source(id, source))
    }

    /// Wraps an already opened report source.
    pub fn from_source(id: impl Into<String>, source: Box<dyn SensorSource>) -> Self {
        Self {
            id: id.into(),
            alias: None,
            state: Mutex::new(ProbeState {
                source: Some(source),
                current: Temperature::default(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn set_alias(&mut self, alias: Option<String>) {
        self.alias = alias;
    }

    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the last parsed temperature without touching the bus.
    pub fn temperature(&self) -> Result<Temperature, ProbeError> {
        let state = self.lock();
        if state.source.is_none() {
            return Err(ProbeError::Closed);
        }
        Ok(state.current)
    }

    /// Re-reads the report from its start and replaces the cached value.
    ///
    /// On any failure the previous value is kept.
    pub fn update(&self) -> Result<(), ProbeError> {
        let mut state = self.lock();
        let source = state.source.as_mut().ok_or(ProbeError::Closed)?;

        source.seek(SeekFrom::Start(0))?;
        let mut content = String::new();
        source.read_to_string(&mut content)?;

        let temperature = parse_report(&content)?;
        state.current = temperature;
        debug!("Probe {} read {}", self.id, temperature);
        Ok(())
    }

    /// Releases the report file. Every later call fails with `Closed`.
    pub fn close(&self) -> Result<(), ProbeError> {
        let mut state = self.lock();
        match state.source.take() {
            Some(_) => {
                debug!("Closed probe {}", self.id);
                Ok(())
            }
            None => Err(ProbeError::Closed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().source.is_none()
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("id", &self.id)
            .field("alias", &self.alias)
            .field("closed", &self.is_closed())
            .finish()
    }
}
