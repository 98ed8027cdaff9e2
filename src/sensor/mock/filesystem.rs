//! In-memory mock filesystem for testing probes without a real 1-Wire bus.
//!
//! This module provides `MockFs` which simulates the sysfs device tree in
//! memory, allowing tests to run on macOS and in CI environments without Linux.

use crate::sensor::traits::{FileSystem, SensorSource};
use std::collections::{HashMap, HashSet};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
struct MockTree {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
    /// Directories that are reported as symbolic links.
    symlinks: HashSet<PathBuf>,
}

impl MockTree {
    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle and rewrite a
/// sensor report after a `Probe` has opened it. Open handles observe the
/// new content on their next read, like a sysfs attribute.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    tree: Arc<RwLock<MockTree>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        tree.add_parents(&path);
        tree.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        tree.add_parents(&path);
        tree.directories.insert(path);
    }

    /// Adds a directory that reports itself as a symbolic link.
    pub fn add_symlink_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_dir(&path);
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        tree.symlinks.insert(path);
    }

    /// Adds a bus master entry such as `w1_bus_master1`.
    pub fn add_master(&self, devices_path: impl AsRef<Path>, name: &str) {
        self.add_symlink_dir(devices_path.as_ref().join(name));
    }

    /// Adds a sensor entry with its `w1_slave` report.
    pub fn add_sensor(&self, devices_path: impl AsRef<Path>, id: &str, report: &str) {
        let dir = devices_path.as_ref().join(id);
        self.add_symlink_dir(&dir);
        self.add_file(dir.join("w1_slave"), report);
    }

    /// Replaces the report of an existing sensor entry.
    pub fn set_report(&self, devices_path: impl AsRef<Path>, id: &str, report: &str) {
        self.add_file(devices_path.as_ref().join(id).join("w1_slave"), report);
    }

    /// Removes a file, simulating a sensor that vanished from the bus.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        tree.files.remove(path.as_ref());
    }

    fn content(&self, path: &Path) -> io::Result<String> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        tree.files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("file", path))
    }
}

fn not_found(kind: &str, path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found: {:?}", kind, path),
    )
}

/// Open handle onto a `MockFs` file.
///
/// Content is looked up on every read, so rewrites and removals are visible.
struct MockSource {
    fs: MockFs,
    path: PathBuf,
    pos: u64,
}

impl Read for MockSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let content = self.fs.content(&self.path)?;
        let bytes = content.as_bytes();
        let start = (self.pos as usize).min(bytes.len());
        let n = (bytes.len() - start).min(buf.len());
        buf[..n].copy_from_slice(&bytes[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for MockSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.fs.content(&self.path)?.len() as i64;
        let target = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::Current(delta) => self.pos as i64 + delta,
            SeekFrom::End(delta) => len + delta,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of file",
            ));
        }
        self.pos = target as u64;
        Ok(self.pos)
    }
}

impl FileSystem for MockFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        if !tree.directories.contains(path) {
            return Err(not_found("directory", path));
        }

        let mut entries = HashSet::new();

        // Find all files and directories that are direct children
        for file_path in tree.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &tree.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }

    fn is_symlink(&self, path: &Path) -> bool {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        tree.symlinks.contains(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn SensorSource>> {
        // Fail at open time like File::open does.
        self.content(path)?;
        Ok(Box::new(MockSource {
            fs: self.clone(),
            path: path.to_path_buf(),
            pos: 0,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let fs = MockFs::new();
        fs.add_file("/sys/bus/w1/devices/28-1/w1_slave", "report\n");

        assert!(fs.open(Path::new("/sys/bus/w1/devices/28-1/w1_slave")).is_ok());
        let entries = fs.read_dir(Path::new("/sys/bus/w1/devices")).unwrap();
        assert_eq!(entries, vec![PathBuf::from("/sys/bus/w1/devices/28-1")]);
        assert!(!fs.is_symlink(Path::new("/sys/bus/w1/devices/28-1")));
    }

    #[test]
    fn test_mock_fs_read_dir() {
        let fs = MockFs::new();
        fs.add_sensor("/w1", "28-a", "a");
        fs.add_sensor("/w1", "28-b", "b");
        fs.add_master("/w1", "w1_bus_master1");

        let entries = fs.read_dir(Path::new("/w1")).unwrap();
        assert_eq!(entries.len(), 3);

        let sensor_entries = fs.read_dir(Path::new("/w1/28-a")).unwrap();
        assert_eq!(sensor_entries, vec![PathBuf::from("/w1/28-a/w1_slave")]);
        assert!(fs.is_symlink(Path::new("/w1/28-a")));
    }

    #[test]
    fn test_mock_fs_open_sees_rewrites() {
        let fs = MockFs::new();
        fs.add_sensor("/w1", "28-a", "first");

        let mut source = fs.open(Path::new("/w1/28-a/w1_slave")).unwrap();
        let mut buf = String::new();
        source.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "first");

        fs.set_report("/w1", "28-a", "second");
        source.seek(SeekFrom::Start(0)).unwrap();
        buf.clear();
        source.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "second");
    }

    #[test]
    fn test_mock_fs_removed_file_fails_read() {
        let fs = MockFs::new();
        fs.add_sensor("/w1", "28-a", "first");
        let mut source = fs.open(Path::new("/w1/28-a/w1_slave")).unwrap();

        fs.remove_file("/w1/28-a/w1_slave");
        let mut buf = String::new();
        let err = source.read_to_string(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.open(Path::new("/nonexistent"));
        assert_eq!(result.err().unwrap().kind(), io::ErrorKind::NotFound);
        assert!(fs.read_dir(Path::new("/nonexistent")).is_err());
    }
}
