// Storage backends for the cache store.
// The store serializes the whole mapping; a backend only moves one blob of text.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

/// Persistent home of the serialized cache mapping.
///
/// Implementations hold a single document. `load` returns `Ok(None)` when
/// nothing has been saved yet; `remove` succeeds when nothing is there.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, contents: &str) -> io::Result<()>;
    fn remove(&self) -> io::Result<()>;
    fn exists(&self) -> bool;
}

/// Backend writing to a single JSON file, creating its directory on save.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, contents: &str) -> io::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        // Each writer gets its own temp file; the rename is the only shared step
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// In-process backend, used by tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    contents: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with a raw document.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.contents
            .lock()
            .map_err(|_| io::Error::other("memory backend lock poisoned"))
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, contents: &str) -> io::Result<()> {
        *self.lock()? = Some(contents.to_string());
        Ok(())
    }

    fn remove(&self) -> io::Result<()> {
        *self.lock()? = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.lock().map(|c| c.is_some()).unwrap_or(false)
    }
}
