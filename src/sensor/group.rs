//! Thread-safe collection of probes with aggregate reads.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::config::BusConfig;
use crate::sensor::discovery::slaves;
use crate::sensor::error::ProbeError;
use crate::sensor::probe::Probe;
use crate::sensor::traits::FileSystem;
use crate::temperature::Temperature;

/// Temperatures keyed by sensor ID or alias.
pub type Readings = BTreeMap<String, Temperature>;

type ProbeMap = BTreeMap<String, Probe>;

/// Owns every probe on the bus and serializes access to them.
///
/// The group lock is held for the whole of each operation, so an update,
/// a read and a close never interleave. Once closed the probe map is gone
/// and every call fails with [`ProbeError::Closed`].
///
/// Aggregate operations stop at the first failing probe and return its
/// error; changes already applied to earlier probes are kept.
#[derive(Debug)]
pub struct ProbeGroup {
    probes: Mutex<Option<ProbeMap>>,
}

impl ProbeGroup {
    /// Discovers the sensors on the bus and opens a probe for each.
    pub fn create<F: FileSystem + ?Sized>(fs: &F, config: &BusConfig) -> Result<Self, ProbeError> {
        let ids = slaves(fs, config)?;
        Self::with_ids(fs, config, ids)
    }

    /// Opens a probe for each of the given sensor IDs.
    ///
    /// Fails with `NoSensorsFound` for an empty list and with the first
    /// open error otherwise; probes opened so far are released.
    pub fn with_ids<F, I>(fs: &F, config: &BusConfig, ids: I) -> Result<Self, ProbeError>
    where
        F: FileSystem + ?Sized,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut probes = ProbeMap::new();
        for id in ids {
            let probe = Probe::open(fs, config, id)?;
            probes.insert(probe.id().to_string(), probe);
        }
        if probes.is_empty() {
            return Err(ProbeError::NoSensorsFound);
        }

        info!("Opened {} probes", probes.len());
        Ok(Self {
            probes: Mutex::new(Some(probes)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<ProbeMap>> {
        self.probes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` on the probe map, or fails if the group is closed.
    fn with_probes<T>(
        &self,
        f: impl FnOnce(&mut ProbeMap) -> Result<T, ProbeError>,
    ) -> Result<T, ProbeError> {
        let mut guard = self.lock();
        let probes = guard.as_mut().ok_or(ProbeError::Closed)?;
        f(probes)
    }

    /// Gives sensor `id` a human-readable alias.
    ///
    /// If another probe already carries the alias it loses it, so alias
    /// lookups always resolve to the most recent assignment.
    pub fn assign_alias(&self, alias: &str, id: &str) -> Result<(), ProbeError> {
        self.with_probes(|probes| {
            if !probes.contains_key(id) {
                return Err(ProbeError::NotFound(id.to_string()));
            }
            for probe in probes.values_mut() {
                if probe.alias() == Some(alias) {
                    debug!("Alias {} moved away from {}", alias, probe.id());
                    probe.set_alias(None);
                }
            }
            if let Some(probe) = probes.get_mut(id) {
                probe.set_alias(Some(alias.to_string()));
            }
            Ok(())
        })
    }

    /// Returns the cached temperature of sensor `id`.
    pub fn read_single(&self, id: &str) -> Result<Temperature, ProbeError> {
        self.with_probes(|probes| {
            probes
                .get(id)
                .ok_or_else(|| ProbeError::NotFound(id.to_string()))?
                .temperature()
        })
    }

    /// Returns the cached temperature of the sensor carrying `alias`.
    pub fn read_single_alias(&self, alias: &str) -> Result<Temperature, ProbeError> {
        self.with_probes(|probes| {
            probes
                .values()
                .find(|probe| probe.alias() == Some(alias))
                .ok_or_else(|| ProbeError::NotFound(alias.to_string()))?
                .temperature()
        })
    }

    /// Snapshots every probe's cached temperature, keyed by sensor ID.
    pub fn read(&self) -> Result<Readings, ProbeError> {
        self.with_probes(|probes| {
            probes
                .iter()
                .map(|(id, probe)| probe.temperature().map(|t| (id.clone(), t)))
                .collect()
        })
    }

    /// Like [`ProbeGroup::read`] but keyed by alias; unaliased probes are left out.
    pub fn read_alias(&self) -> Result<Readings, ProbeError> {
        self.with_probes(|probes| {
            probes
                .values()
                .filter_map(|probe| probe.alias().map(|alias| (alias, probe)))
                .map(|(alias, probe)| probe.temperature().map(|t| (alias.to_string(), t)))
                .collect()
        })
    }

    /// Re-reads every sensor, in ID order.
    pub fn update(&self) -> Result<(), ProbeError> {
        self.with_probes(|probes| {
            for probe in probes.values() {
                if let Err(e) = probe.update() {
                    debug!("Update of probe {} failed: {}", probe.id(), e);
                    return Err(e);
                }
            }
            Ok(())
        })
    }

    /// Closes every probe and discards the probe map.
    ///
    /// The group is closed afterwards even if a probe fails to close.
    pub fn close(&self) -> Result<(), ProbeError> {
        let probes = self.lock().take().ok_or(ProbeError::Closed)?;
        for probe in probes.values() {
            probe.close()?;
        }
        info!("Closed {} probes", probes.len());
        Ok(())
    }

    /// Sensor IDs in the group, sorted.
    pub fn ids(&self) -> Result<Vec<String>, ProbeError> {
        self.with_probes(|probes| Ok(probes.keys().cloned().collect()))
    }

    /// Number of probes; zero once closed.
    pub fn len(&self) -> usize {
        self.lock().as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }
}
