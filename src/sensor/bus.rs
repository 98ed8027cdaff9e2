//! 1-Wire bus bootstrap: kernel modules and master detection.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::config::BusConfig;
use crate::sensor::discovery::master_present;
use crate::sensor::error::ProbeError;
use crate::sensor::traits::FileSystem;

/// Loads kernel modules by name.
pub trait ModuleLoader {
    fn load(&self, module: &str) -> io::Result<()>;
}

/// Loads modules by running `modprobe`.
#[derive(Debug, Clone)]
pub struct Modprobe {
    command: PathBuf,
}

impl Modprobe {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_config(config: &BusConfig) -> Self {
        Self::new(config.modprobe.clone())
    }
}

impl ModuleLoader for Modprobe {
    fn load(&self, module: &str) -> io::Result<()> {
        let status = Command::new(&self.command).arg(module).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "{} {} failed: {}",
                self.command.display(),
                module,
                status
            )))
        }
    }
}

/// Ensures the w1 kernel modules are loaded and a bus master is present.
///
/// Modules are loaded in configuration order; the first failure aborts.
pub fn setup<F, L>(fs: &F, loader: &L, config: &BusConfig) -> Result<(), ProbeError>
where
    F: FileSystem + ?Sized,
    L: ModuleLoader + ?Sized,
{
    for module in &config.modules {
        debug!("Loading kernel module {}", module);
        loader.load(module)?;
    }

    if !master_present(fs, config)? {
        return Err(ProbeError::NoBusPresent);
    }

    info!("1-Wire bus ready at {}", config.devices_path.display());
    Ok(())
}
