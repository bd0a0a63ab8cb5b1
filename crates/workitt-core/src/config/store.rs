//! Document storage backends.
//!
//! Defines the [`DocumentStore`] trait and provides [`FileDocumentStore`],
//! which keeps the document as `config.json` under the data directory, and
//! [`MemoryDocumentStore`] for tests and embedding.

use super::ConfigDocument;
use crate::error::ConfigError;
use crate::paths;
use parking_lot::Mutex;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage backend for the configuration document.
pub trait DocumentStore: Send + Sync {
    /// Read the stored document, or `None` if nothing has been stored yet.
    fn read(&self) -> Result<Option<ConfigDocument>, ConfigError>;

    /// Replace the stored document.
    fn write(&self, doc: &ConfigDocument) -> Result<(), ConfigError>;

    /// Take the cross-process lock guarding read-modify-write cycles.
    ///
    /// Backends shared only within one process return an empty guard.
    fn lock(&self) -> Result<StoreLock, ConfigError> {
        Ok(StoreLock::none())
    }

    /// Take the shared side of the cross-process lock, for readers that
    /// must not observe a read-modify-write cycle halfway.
    fn lock_shared(&self) -> Result<StoreLock, ConfigError> {
        Ok(StoreLock::none())
    }

    /// Human-readable location, for diagnostics.
    fn location(&self) -> String;
}

/// Guard for a backend's cross-process lock; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    // The advisory lock lives as long as the descriptor stays open.
    _file: Option<File>,
}

impl StoreLock {
    /// A guard that holds nothing.
    pub fn none() -> Self {
        Self { _file: None }
    }
}

/// A store backed by `config.json` in a data directory.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileDocumentStore {
    /// Create a store for the document under `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: paths::config_file(data_dir),
            lock_path: paths::lock_file(data_dir),
        }
    }

    /// Path of the configuration document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire(&self, mode: LockMode) -> Result<StoreLock, ConfigError> {
        if let Some(parent) = self.lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        flock_file(&file, &self.lock_path, mode)?;
        Ok(StoreLock { _file: Some(file) })
    }
}

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

impl DocumentStore for FileDocumentStore {
    fn read(&self) -> Result<Option<ConfigDocument>, ConfigError> {
        ConfigDocument::read_from(&self.path)
    }

    fn write(&self, doc: &ConfigDocument) -> Result<(), ConfigError> {
        debug!(path = %self.path.display(), "writing configuration document");
        doc.write_to(&self.path)
    }

    fn lock(&self) -> Result<StoreLock, ConfigError> {
        self.acquire(LockMode::Exclusive)
    }

    fn lock_shared(&self) -> Result<StoreLock, ConfigError> {
        self.acquire(LockMode::Shared)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(unix)]
fn flock_file(file: &File, path: &Path, mode: LockMode) -> Result<(), ConfigError> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    let arg = match mode {
        LockMode::Shared => FlockArg::LockShared,
        LockMode::Exclusive => FlockArg::LockExclusive,
    };
    flock(file.as_raw_fd(), arg).map_err(|e| ConfigError::Lock {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

// Only the in-process lock applies on platforms without flock.
#[cfg(not(unix))]
fn flock_file(_file: &File, _path: &Path, _mode: LockMode) -> Result<(), ConfigError> {
    Ok(())
}

/// An in-memory store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    doc: Mutex<Option<ConfigDocument>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `doc`.
    pub fn with_document(doc: ConfigDocument) -> Self {
        Self {
            doc: Mutex::new(Some(doc)),
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read(&self) -> Result<Option<ConfigDocument>, ConfigError> {
        Ok(self.doc.lock().clone())
    }

    fn write(&self, doc: &ConfigDocument) -> Result<(), ConfigError> {
        *self.doc.lock() = Some(doc.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
