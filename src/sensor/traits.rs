//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait allows the bus code to work with both the real
//! `/sys/bus/w1/devices` tree on Linux and an in-memory bus for tests.

use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

/// A readable, rewindable sensor report.
///
/// The kernel regenerates the `w1_slave` pseudo-file on every read from
/// offset zero, so callers seek back to the start before each sample.
pub trait SensorSource: Read + Seek + Send {}

impl<T: Read + Seek + Send> SensorSource for T {}

/// Abstraction for filesystem operations.
///
/// This trait allows probes to read from the real sysfs or from
/// a mock implementation for testing purposes.
pub trait FileSystem: Send + Sync {
    /// Lists entries in a directory.
    ///
    /// # Returns
    /// A vector of paths to entries in the directory, or an I/O error.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Checks if the entry itself is a symbolic link (without following it).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Opens a file for repeated reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn SensorSource>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
///
/// Use this in production to read from the actual 1-Wire sysfs tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn SensorSource>> {
        Ok(Box::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::SeekFrom;

    #[test]
    fn test_real_fs_read_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "1").unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();

        let fs = RealFs::new();
        let mut entries = fs.read_dir(dir.path()).unwrap();
        entries.sort();
        assert_eq!(entries, vec![dir.path().join("a"), dir.path().join("b")]);
    }

    #[test]
    fn test_real_fs_read_dir_missing() {
        let fs = RealFs::new();
        let err = fs.read_dir(Path::new("/nonexistent/path/12345")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_fs_is_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        std::fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let fs = RealFs::new();
        assert!(fs.is_symlink(&link));
        assert!(!fs.is_symlink(&target));
        assert!(!fs.is_symlink(&dir.path().join("missing")));
    }

    #[test]
    fn test_real_fs_open_rewinds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w1_slave");
        std::fs::write(&path, "hello").unwrap();

        let fs = RealFs::new();
        let mut source = fs.open(&path).unwrap();
        let mut first = String::new();
        source.read_to_string(&mut first).unwrap();
        source.seek(SeekFrom::Start(0)).unwrap();
        let mut second = String::new();
        source.read_to_string(&mut second).unwrap();
        assert_eq!(first, "hello");
        assert_eq!(second, "hello");
    }

    #[test]
    fn test_real_fs_open_missing() {
        let fs = RealFs::new();
        let err = fs.open(Path::new("/nonexistent/w1_slave")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
