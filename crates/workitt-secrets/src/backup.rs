//! Data directory backup and restore.
//!
//! A backup is a `backup_YYYYMMDD_HHMMSS` directory holding `config.json`,
//! `key/.wm.key` when a key exists, and a `manifest.json` listing each file
//! with its SHA-256. Keep backups as private as the data directory itself:
//! the key and the document together decrypt every secret.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::MasterKey;
use crate::error::{Result, SecretError};
use crate::keystore::{create_private_dir, write_key_file};
use workitt_core::{paths, ConfigDocument, ConfigHandle};

/// Manifest file name inside a backup directory.
pub const MANIFEST_FILE: &str = "manifest.json";

const CONFIG_ENTRY: &str = "config.json";
const KEY_ENTRY: &str = "key/.wm.key";

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub created_at: DateTime<Utc>,
    pub files: Vec<BackupEntry>,
}

impl BackupManifest {
    /// Whether the backup carries a master key.
    pub fn has_key(&self) -> bool {
        self.files.iter().any(|f| f.path == KEY_ENTRY)
    }
}

/// One file in a backup, relative to the backup directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEntry {
    pub path: String,
    pub size: u64,
    pub sha256: String,
}

/// A backup on disk.
#[derive(Debug, Clone)]
pub struct Backup {
    pub dir: PathBuf,
    pub manifest: BackupManifest,
}

/// Result of a restore.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    /// Backup of the data taken just before restoring.
    pub snapshot: Backup,
    /// Entries written back into the data directory.
    pub restored: Vec<String>,
}

/// Back up the document and key into a new directory under `dest`
/// (default `<data_dir>/backups`).
pub fn create_backup(config: &ConfigHandle, dest: Option<&Path>) -> Result<Backup> {
    let root = dest
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths::backups_dir(config.data_dir()));
    fs::create_dir_all(&root).map_err(|e| SecretError::storage(&root, e))?;

    // Held under the exclusive lock so the document and key match.
    let backup = config.update(|doc| -> Result<Backup> {
        let created_at = Utc::now();
        let dir = unique_dir(&root, &created_at);
        create_private_dir(&dir)?;

        let mut files = Vec::new();

        let config_path = dir.join(CONFIG_ENTRY);
        doc.write_to(&config_path)?;
        files.push(entry_for(&config_path, CONFIG_ENTRY)?);

        match doc.security.key_path() {
            Some(key_path) => match fs::read(&key_path) {
                Ok(bytes) => {
                    let bytes = Zeroizing::new(bytes);
                    let key = MasterKey::from_slice(&bytes).ok_or_else(|| {
                        SecretError::InvalidKeyFile {
                            path: key_path.clone(),
                            len: bytes.len(),
                        }
                    })?;
                    let target = dir.join(KEY_ENTRY);
                    create_private_dir(&dir.join("key"))?;
                    write_key_file(&target, &key)?;
                    files.push(entry_for(&target, KEY_ENTRY)?);
                }
                Err(e) => {
                    warn!(path = %key_path.display(), error = %e, "master key not readable; backing up configuration only");
                }
            },
            None => info!("no master key recorded; backing up configuration only"),
        }

        let manifest = BackupManifest { created_at, files };
        write_manifest(&dir, &manifest)?;
        Ok(Backup { dir, manifest })
    })?;

    info!(dir = %backup.dir.display(), files = backup.manifest.files.len(), "created backup");
    Ok(backup)
}

/// Read and verify a backup without touching the data directory.
pub fn verify_backup(dir: &Path) -> Result<Backup> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&manifest_path)
        .map_err(|e| SecretError::Backup(format!("cannot read {}: {}", manifest_path.display(), e)))?;
    let manifest: BackupManifest = serde_json::from_str(&content)
        .map_err(|e| SecretError::Backup(format!("invalid manifest: {}", e)))?;

    if !manifest.files.iter().any(|f| f.path == CONFIG_ENTRY) {
        return Err(SecretError::Backup(format!("manifest does not list {CONFIG_ENTRY}")));
    }

    for expected in &manifest.files {
        if expected.path != CONFIG_ENTRY && expected.path != KEY_ENTRY {
            return Err(SecretError::Backup(format!(
                "unexpected entry '{}' in manifest",
                expected.path
            )));
        }
        let actual = entry_for(&dir.join(&expected.path), &expected.path)?;
        if actual != *expected {
            return Err(SecretError::Backup(format!(
                "checksum mismatch for {}",
                expected.path
            )));
        }
    }

    Ok(Backup {
        dir: dir.to_path_buf(),
        manifest,
    })
}

/// Restore a verified backup into the data directory.
///
/// The current document and key are backed up first. When the backup holds
/// a key it replaces the current one; otherwise the current key is left in
/// place.
pub fn restore_backup(config: &ConfigHandle, dir: &Path) -> Result<RestoreReport> {
    let backup = verify_backup(dir)?;
    let content = fs::read_to_string(dir.join(CONFIG_ENTRY))
        .map_err(|e| SecretError::storage(dir.join(CONFIG_ENTRY), e))?;
    let restored_doc = ConfigDocument::parse(&content)?;

    let key = if backup.manifest.has_key() {
        let path = dir.join(KEY_ENTRY);
        let bytes = Zeroizing::new(fs::read(&path).map_err(|e| SecretError::storage(&path, e))?);
        let key = MasterKey::from_slice(&bytes).ok_or_else(|| SecretError::InvalidKeyFile {
            path: path.clone(),
            len: bytes.len(),
        })?;
        Some(key)
    } else {
        None
    };

    let snapshot = create_backup(config, None)?;

    let restored = config.update(|doc| -> Result<Vec<String>> {
        *doc = restored_doc;
        let mut restored = vec![CONFIG_ENTRY.to_string()];

        if let Some(key) = &key {
            let key_dir = paths::key_dir(config.data_dir());
            let key_path = paths::key_file(config.data_dir());
            if key_dir.exists() {
                fs::remove_dir_all(&key_dir).map_err(|e| SecretError::storage(&key_dir, e))?;
            }
            create_private_dir(&key_dir)?;
            write_key_file(&key_path, key)?;
            let recorded =
                fs::canonicalize(&key_path).map_err(|e| SecretError::storage(&key_path, e))?;
            // The backup may come from another data directory.
            doc.security.master_key_path = recorded.to_string_lossy().into_owned();
            restored.push(KEY_ENTRY.to_string());
        }
        Ok(restored)
    })?;

    info!(
        from = %dir.display(),
        snapshot = %snapshot.dir.display(),
        "restored backup"
    );
    Ok(RestoreReport { snapshot, restored })
}

fn unique_dir(root: &Path, created_at: &DateTime<Utc>) -> PathBuf {
    let base = format!("backup_{}", created_at.format("%Y%m%d_%H%M%S"));
    let mut candidate = root.join(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = root.join(format!("{base}_{n}"));
        n += 1;
    }
    candidate
}

fn entry_for(path: &Path, name: &str) -> Result<BackupEntry> {
    let bytes = Zeroizing::new(fs::read(path).map_err(|e| SecretError::storage(path, e))?);
    Ok(BackupEntry {
        path: name.to_string(),
        size: bytes.len() as u64,
        sha256: hex::encode(Sha256::digest(bytes.as_slice())),
    })
}

fn write_manifest(dir: &Path, manifest: &BackupManifest) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)
        .map_err(|e| SecretError::Backup(format!("cannot serialize manifest: {}", e)))?;
    fs::write(&path, json).map_err(|e| SecretError::storage(&path, e))
}
