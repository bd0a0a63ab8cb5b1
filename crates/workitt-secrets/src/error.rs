//! Error types for secret management.

use crate::types::SecretField;
use std::path::PathBuf;
use thiserror::Error;
use workitt_core::ConfigError;

/// Message shown to end users for any unusable secret.
pub const UNAVAILABLE_MESSAGE: &str = "secret unavailable";

/// Errors that can occur during key and secret operations.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Master key not configured; generate a key first")]
    KeyNotConfigured,

    #[error("Master key file missing or unreadable: {}", path.display())]
    KeyFileMissing { path: PathBuf },

    #[error("Master key file {} has {len} bytes, expected 32", path.display())]
    InvalidKeyFile { path: PathBuf, len: usize },

    // Deliberately carries no detail.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Secret not configured: {0}")]
    SecretNotConfigured(SecretField),

    #[error("Unknown secret field: {0}")]
    UnknownField(String),

    #[error("Decrypted secret is not valid UTF-8")]
    InvalidEncoding,

    #[error("Unsupported AI platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Required setting missing: {0}")]
    Incomplete(&'static str),

    #[error("Encryption failed")]
    Encryption,

    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not restrict permissions on {}: {source}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SecretError {
    /// Wrap an IO error with the path it concerns.
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "the secret cannot be used".
    ///
    /// Consumers treat every such error as "feature unavailable".
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::KeyNotConfigured
                | Self::KeyFileMissing { .. }
                | Self::InvalidKeyFile { .. }
                | Self::AuthenticationFailed
                | Self::SecretNotConfigured(_)
                | Self::InvalidEncoding
        )
    }

    /// Message safe for end-user surfaces.
    ///
    /// Unavailable-secret kinds collapse into one string so observers cannot
    /// tell a lost key from a tampered blob; operator tooling should print
    /// the error's `Display` instead.
    pub fn public_message(&self) -> String {
        if self.is_unavailable() {
            UNAVAILABLE_MESSAGE.to_string()
        } else {
            match self {
                Self::UnsupportedPlatform(_) | Self::Incomplete(_) => self.to_string(),
                _ => "internal configuration error".to_string(),
            }
        }
    }
}

/// Convenience result alias for secret operations.
pub type Result<T> = std::result::Result<T, SecretError>;
