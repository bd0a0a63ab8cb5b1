//! Path resolution utilities.
//!
//! Everything Workitt persists lives under a single data directory:
//!
//! ```text
//! <data_dir>/
//!   config.json      configuration document
//!   .config.lock     advisory lock for read-modify-write
//!   key/.wm.key      master key (the only file in the secrets directory)
//!   backups/         default destination for `workitt backup create`
//! ```

use crate::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WORKITT_DATA_DIR";

const CONFIG_FILE_NAME: &str = "config.json";
const LOCK_FILE_NAME: &str = ".config.lock";
const KEY_DIR_NAME: &str = "key";
const KEY_FILE_NAME: &str = ".wm.key";
const BACKUPS_DIR_NAME: &str = "backups";

/// Resolve the data directory.
///
/// Order: `WORKITT_DATA_DIR`, then `<platform data dir>/workitt`, then `./data`.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = env::get_var(DATA_DIR_ENV) {
        return expand_tilde(&dir);
    }
    match dirs::data_dir() {
        Some(dir) => dir.join("workitt"),
        None => PathBuf::from("data"),
    }
}

/// Configuration document path (`<data_dir>/config.json`).
pub fn config_file(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Advisory lock file guarding the configuration document.
pub fn lock_file(data_dir: &Path) -> PathBuf {
    data_dir.join(LOCK_FILE_NAME)
}

/// Secrets storage directory (`<data_dir>/key`).
///
/// Key generation deletes and recreates this directory.
pub fn key_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(KEY_DIR_NAME)
}

/// Fixed master key location (`<data_dir>/key/.wm.key`).
pub fn key_file(data_dir: &Path) -> PathBuf {
    key_dir(data_dir).join(KEY_FILE_NAME)
}

/// Default backup destination (`<data_dir>/backups`).
pub fn backups_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(BACKUPS_DIR_NAME)
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
