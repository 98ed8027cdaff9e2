//! Bus layout and bootstrap configuration.

use std::path::{Path, PathBuf};

/// Locations and names used to find DS18B20 sensors on the 1-Wire bus.
///
/// `Default` matches the Linux w1 subsystem; tests and unusual systems
/// can point `devices_path` somewhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Directory holding master and slave entries.
    pub devices_path: PathBuf,
    /// Name prefix of bus master entries.
    pub master_prefix: String,
    /// Name prefix of DS18B20 slave entries (family code 0x28).
    pub slave_prefix: String,
    /// Report file inside each slave directory.
    pub data_file: String,
    /// Command used to load kernel modules.
    pub modprobe: PathBuf,
    /// Kernel modules loaded by bus setup, in order.
    pub modules: Vec<String>,
}

impl BusConfig {
    pub const DEFAULT_DEVICES_PATH: &'static str = "/sys/bus/w1/devices";

    /// Returns a copy of this configuration rooted at another devices directory.
    pub fn with_devices_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.devices_path = path.into();
        self
    }

    /// Path of the report file for sensor `id`.
    pub fn data_path(&self, id: &str) -> PathBuf {
        self.devices_path.join(id).join(&self.data_file)
    }

    pub fn devices_path(&self) -> &Path {
        &self.devices_path
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            devices_path: PathBuf::from(Self::DEFAULT_DEVICES_PATH),
            master_prefix: "w1_bus_master".to_string(),
            slave_prefix: "28-".to_string(),
            data_file: "w1_slave".to_string(),
            modprobe: PathBuf::from("/sbin/modprobe"),
            modules: vec!["w1-gpio".to_string(), "w1-therm".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BusConfig::default();
        assert_eq!(config.devices_path(), Path::new("/sys/bus/w1/devices"));
        assert_eq!(config.modules, vec!["w1-gpio", "w1-therm"]);
        assert_eq!(
            config.data_path("28-000005e2fdc3"),
            PathBuf::from("/sys/bus/w1/devices/28-000005e2fdc3/w1_slave")
        );
    }

    #[test]
    fn test_with_devices_path() {
        let config = BusConfig::default().with_devices_path("/tmp/w1");
        assert_eq!(config.data_path("28-1"), PathBuf::from("/tmp/w1/28-1/w1_slave"));
        assert_eq!(config.slave_prefix, "28-");
    }
}
