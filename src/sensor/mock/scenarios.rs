//! Pre-built mock bus scenarios for testing.
//!
//! These scenarios provide realistic `/sys/bus/w1/devices` states
//! for testing discovery, bootstrap and group reads.

use super::filesystem::MockFs;

/// Default sysfs location of 1-Wire devices, used by every scenario.
pub const DEVICES_PATH: &str = "/sys/bus/w1/devices";

/// Builds a `w1_slave` report for the given raw reading.
///
/// `crc_ok` selects the trailing `YES`/`NO` integrity marker.
pub fn report(millidegrees: u32, crc_ok: bool) -> String {
    format!(
        "01 4b 46 ff ff 0c 10 10 7f : crc=7f {}\n01 4b 46 ff ff 0c 10 10 7f t={}\n",
        if crc_ok { "YES" } else { "NO" },
        millidegrees
    )
}

impl MockFs {
    /// Creates a bus with one master and three DS18B20 sensors.
    ///
    /// Sensors `28-000005e2fdc3`, `28-000005e3a1b2` and `28-0316a2794eff`
    /// read 23.562, 19.125 and 85.000 C. A foreign family device
    /// (`10-000802b4a1c3`) is present too and must be ignored.
    pub fn typical_bus() -> Self {
        let fs = Self::new();
        fs.add_master(DEVICES_PATH, "w1_bus_master1");
        fs.add_sensor(
            DEVICES_PATH,
            "28-000005e2fdc3",
            "01 4b 46 ff ff 0c 10 10 7f : crc=7f YES\n02 01 4b 46 ff ff 0c 10 t=23562\n",
        );
        fs.add_sensor(DEVICES_PATH, "28-000005e3a1b2", &report(19125, true));
        fs.add_sensor(DEVICES_PATH, "28-0316a2794eff", &report(85000, true));
        fs.add_symlink_dir(format!("{}/10-000802b4a1c3", DEVICES_PATH));
        fs
    }

    /// Creates a bus with a master but no sensors attached.
    pub fn empty_bus() -> Self {
        let fs = Self::new();
        fs.add_master(DEVICES_PATH, "w1_bus_master1");
        fs
    }

    /// Creates a devices directory with no bus master present.
    pub fn no_master() -> Self {
        let fs = Self::new();
        fs.add_dir(DEVICES_PATH);
        fs
    }
}
