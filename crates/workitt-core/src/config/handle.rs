//! Shared, lock-protected access to the configuration document.

use super::store::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
use super::ConfigDocument;
use crate::error::ConfigError;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Handle to the configuration document.
///
/// Cloning is cheap; clones share the same store and lock. Reads take the
/// shared side of the lock, writes and read-modify-write cycles the exclusive
/// side plus the store's cross-process lock.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<Inner>,
}

struct Inner {
    store: Box<dyn DocumentStore>,
    data_dir: PathBuf,
    lock: RwLock<()>,
}

impl ConfigHandle {
    /// Create a handle over an arbitrary store.
    ///
    /// `data_dir` is where the secrets directory and backups live.
    pub fn new(store: Box<dyn DocumentStore>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                data_dir: data_dir.into(),
                lock: RwLock::new(()),
            }),
        }
    }

    /// Handle backed by `<data_dir>/config.json`.
    pub fn open(data_dir: &Path) -> Self {
        Self::new(Box::new(FileDocumentStore::new(data_dir)), data_dir)
    }

    /// Handle backed by memory; the key still lives under `data_dir`.
    pub fn in_memory(data_dir: &Path) -> Self {
        Self::new(Box::new(MemoryDocumentStore::new()), data_dir)
    }

    /// The data directory this handle was opened for.
    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }

    /// Where the document is stored, for diagnostics.
    pub fn location(&self) -> String {
        self.inner.store.location()
    }

    /// Load the document, writing the defaults first if none exists.
    pub fn load(&self) -> Result<ConfigDocument, ConfigError> {
        {
            let _read = self.inner.lock.read();
            if let Some(doc) = self.inner.store.read()? {
                return Ok(doc);
            }
        }

        let _write = self.inner.lock.write();
        let _store_lock = self.inner.store.lock()?;
        // Another writer may have created it while we waited.
        if let Some(doc) = self.inner.store.read()? {
            return Ok(doc);
        }
        let doc = ConfigDocument::default();
        self.inner.store.write(&doc)?;
        info!(location = %self.location(), "created default configuration");
        Ok(doc)
    }

    /// Run `f` against the stored document under the shared lock.
    ///
    /// Unlike [`load`](Self::load) an absent document is not created; `f`
    /// sees the defaults. Writers are held off until `f` returns, so files
    /// the document points at stay consistent with it. Like
    /// [`update`](Self::update), `f` must not call back into the handle.
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&ConfigDocument) -> Result<T, E>,
        E: From<ConfigError>,
    {
        let _read = self.inner.lock.read();
        let _store_lock = self.inner.store.lock_shared()?;
        let doc = self.inner.store.read()?.unwrap_or_default();
        f(&doc)
    }

    /// Persist the whole document, overwriting the previous version.
    pub fn save(&self, doc: &ConfigDocument) -> Result<(), ConfigError> {
        let _write = self.inner.lock.write();
        let _store_lock = self.inner.store.lock()?;
        self.inner.store.write(doc)
    }

    /// Read-modify-write under the exclusive lock.
    ///
    /// The document is saved only when `f` returns `Ok`. The lock is not
    /// reentrant: `f` must not call back into this handle or its clones.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut ConfigDocument) -> Result<T, E>,
        E: From<ConfigError>,
    {
        let _write = self.inner.lock.write();
        let _store_lock = self.inner.store.lock()?;
        let mut doc = self.inner.store.read()?.unwrap_or_default();
        let out = f(&mut doc)?;
        self.inner.store.write(&doc)?;
        debug!(location = %self.location(), "configuration updated");
        Ok(out)
    }
}

impl std::fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigHandle")
            .field("location", &self.location())
            .field("data_dir", &self.inner.data_dir)
            .finish()
    }
}
