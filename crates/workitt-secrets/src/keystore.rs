//! Master key lifecycle.
//!
//! The key is a 32-byte file at `<data_dir>/key/.wm.key`; the configuration
//! document records only its path and generation time. The key is read from
//! disk for every operation that needs it and never cached.
//!
//! Generating a key is destructive: the whole `key/` directory is removed
//! first, so every value encrypted under the previous key becomes
//! permanently undecryptable.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::crypto::{MasterKey, KEY_SIZE};
use crate::error::{Result, SecretError};
use workitt_core::{paths, ConfigDocument, ConfigHandle};

/// What key regeneration discards besides the old key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegenerationScope {
    /// Clear every encrypted field; keep hosts, ports, platform and model.
    #[default]
    SecretsOnly,
    /// Reset the whole document to defaults.
    Everything,
}

/// State of the key file referenced by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFileState {
    /// No path recorded.
    NotConfigured,
    /// Present with the expected length.
    Present,
    /// Path recorded but nothing readable there.
    Missing,
    /// Present with the wrong length.
    WrongLength(u64),
}

/// Key diagnostics; holds no key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatus {
    pub path: Option<PathBuf>,
    pub generated_at: Option<DateTime<Utc>>,
    pub file: KeyFileState,
}

impl KeyStatus {
    /// Whether the key can be loaded.
    pub fn is_usable(&self) -> bool {
        self.file == KeyFileState::Present
    }
}

/// Sole owner of the master key's existence and location.
#[derive(Debug, Clone)]
pub struct KeyStore {
    config: ConfigHandle,
}

impl KeyStore {
    /// Create a key store over the given configuration handle.
    pub fn new(config: ConfigHandle) -> Self {
        Self { config }
    }

    /// The configuration handle this store records into.
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Fixed location new keys are written to.
    pub fn default_key_path(&self) -> PathBuf {
        paths::key_file(self.config.data_dir())
    }

    /// Generate a new key, keeping non-secret settings.
    pub fn generate(&self) -> Result<MasterKey> {
        self.generate_with(RegenerationScope::default())
    }

    /// Generate a new key, replacing any previous one.
    ///
    /// Runs under the configuration's exclusive lock, so no other writer can
    /// interleave with the rotation.
    pub fn generate_with(&self, scope: RegenerationScope) -> Result<MasterKey> {
        let key_dir = paths::key_dir(self.config.data_dir());
        let key_path = self.default_key_path();

        self.config.update(|doc| {
            if key_dir.exists() {
                fs::remove_dir_all(&key_dir).map_err(|e| SecretError::storage(&key_dir, e))?;
                warn!(dir = %key_dir.display(), "removed previous secrets directory");
            }
            create_private_dir(&key_dir)?;

            let key = MasterKey::generate();
            write_key_file(&key_path, &key)?;
            let recorded = fs::canonicalize(&key_path).map_err(|e| SecretError::storage(&key_path, e))?;

            match scope {
                RegenerationScope::SecretsOnly => doc.clear_secrets(),
                RegenerationScope::Everything => *doc = ConfigDocument::default(),
            }
            doc.security.master_key_path = recorded.to_string_lossy().into_owned();
            doc.security.key_generated_at = Some(Utc::now());

            info!(path = %recorded.display(), ?scope, "generated new master key");
            Ok(key)
        })
    }

    /// Load the key recorded in the stored configuration document.
    ///
    /// The file is read under the shared lock, so a rotation in another
    /// process is either complete or not started.
    pub fn current(&self) -> Result<MasterKey> {
        self.config.read(Self::key_for)
    }

    /// Load the key recorded in `doc`.
    ///
    /// Touches only the key file, never the handle, so it is safe inside
    /// [`ConfigHandle::update`].
    pub fn key_for(doc: &ConfigDocument) -> Result<MasterKey> {
        let path = doc
            .security
            .key_path()
            .ok_or(SecretError::KeyNotConfigured)?;
        read_key_file(&path)
    }

    /// Report on the recorded key without keeping its bytes.
    pub fn status(&self) -> Result<KeyStatus> {
        let doc = self.config.load()?;
        let path = doc.security.key_path();
        let file = match &path {
            None => KeyFileState::NotConfigured,
            Some(p) => match fs::metadata(p) {
                Ok(meta) if meta.is_file() && meta.len() == KEY_SIZE as u64 => {
                    KeyFileState::Present
                }
                Ok(meta) if meta.is_file() => KeyFileState::WrongLength(meta.len()),
                _ => KeyFileState::Missing,
            },
        };

        Ok(KeyStatus {
            path,
            generated_at: doc.security.key_generated_at,
            file,
        })
    }
}

fn read_key_file(path: &Path) -> Result<MasterKey> {
    let bytes = zeroize::Zeroizing::new(fs::read(path).map_err(|e| {
        debug!(path = %path.display(), kind = ?e.kind(), "master key unreadable");
        SecretError::KeyFileMissing {
            path: path.to_path_buf(),
        }
    })?);

    MasterKey::from_slice(&bytes).ok_or_else(|| SecretError::InvalidKeyFile {
        path: path.to_path_buf(),
        len: bytes.len(),
    })
}

/// Create `dir` readable only by the owner.
pub(crate) fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| SecretError::storage(dir, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        fs::set_permissions(dir, perms).map_err(|e| SecretError::Permission {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    Ok(())
}

/// Write the key with mode 0600 on Unix, failing rather than leaving it readable.
pub(crate) fn write_key_file(path: &Path, key: &MasterKey) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| SecretError::storage(path, e))?;
    file.write_all(key.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| SecretError::storage(path, e))?;

    restrict_permissions(path)
}

#[cfg(unix)]
pub(crate) fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permission_error = |source| SecretError::Permission {
        path: path.to_path_buf(),
        source,
    };
    // The creation mode is subject to umask; set it explicitly and check.
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(permission_error)?;
    let mode = fs::metadata(path).map_err(permission_error)?.permissions().mode();
    ensure_owner_only(path, mode)
}

#[cfg(unix)]
fn ensure_owner_only(path: &Path, mode: u32) -> Result<()> {
    let mode = mode & 0o777;
    if mode != 0o600 {
        return Err(SecretError::Permission {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("mode is {mode:o} after chmod"),
            ),
        });
    }
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn restrict_permissions(path: &Path) -> Result<()> {
    warn!(
        path = %path.display(),
        "owner-only file modes are not supported on this platform; relying on directory ACLs"
    );
    Ok(())
}
