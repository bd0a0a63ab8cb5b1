//! # workitt-core
//!
//! Shared configuration and secret-handling types for Workitt.
//!
//! - **Configuration**: the on-disk configuration document, its stores, and
//!   the lock-protected [`ConfigHandle`] every component is handed
//! - **Secrets**: [`SecretString`] for plaintext in memory and
//!   [`EncryptedBlob`] for ciphertext at rest
//! - **Utilities**: data directory resolution and environment handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::{ConfigDocument, ConfigHandle, MaskedConfig};
pub use error::ConfigError;
pub use secret::{EncryptedBlob, SecretString};
