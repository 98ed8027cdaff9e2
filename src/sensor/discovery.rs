//! Sensor discovery on the 1-Wire devices directory.

use std::io;
use std::path::Path;

use tracing::trace;

use crate::config::BusConfig;
use crate::sensor::traits::FileSystem;

fn entry_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Lists the IDs of DS18B20 sensors attached to the bus.
///
/// Only symlinked entries carrying the slave prefix count; everything else
/// is skipped. An empty bus yields an empty list, not an error. IDs are
/// returned sorted.
pub fn slaves<F: FileSystem + ?Sized>(fs: &F, config: &BusConfig) -> io::Result<Vec<String>> {
    let mut ids = Vec::new();
    for path in fs.read_dir(config.devices_path())? {
        let Some(name) = entry_name(&path) else {
            continue;
        };
        if name.starts_with(&config.slave_prefix) && fs.is_symlink(&path) {
            ids.push(name.to_string());
        } else {
            trace!("Not a slave: {}", name);
        }
    }
    ids.sort();
    Ok(ids)
}

/// Returns `true` if at least one bus master entry is present.
pub fn master_present<F: FileSystem + ?Sized>(fs: &F, config: &BusConfig) -> io::Result<bool> {
    Ok(fs
        .read_dir(config.devices_path())?
        .iter()
        .filter_map(|path| entry_name(path))
        .any(|name| name.starts_with(&config.master_prefix)))
}
