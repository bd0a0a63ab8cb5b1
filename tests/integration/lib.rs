//! Shared fixtures for the cross-crate integration tests.

use std::path::Path;
use tempfile::TempDir;
use workitt_secrets::SecretConfig;

/// A fresh data directory with no configuration or key.
pub fn empty_data_dir() -> TempDir {
    TempDir::new().expect("create temp data dir")
}

/// A fresh data directory with a generated master key.
pub fn keyed_data_dir() -> TempDir {
    let dir = empty_data_dir();
    SecretConfig::open(dir.path())
        .keys()
        .generate()
        .expect("generate master key");
    dir
}

/// Open the data directory as an independent process would.
pub fn reopen(data_dir: &Path) -> SecretConfig {
    SecretConfig::open(data_dir)
}
