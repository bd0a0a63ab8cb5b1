//! Secrets at rest for Workitt.
//!
//! A single AES-256-GCM master key, kept in its own file, protects every
//! sensitive value in the configuration document:
//!
//! - [`KeyStore`] generates, loads and rotates the key
//! - [`CipherBox`] encrypts and authenticates individual values
//! - [`SecretConfig`] stores ciphertext in the document and hands out typed,
//!   decrypted views to consumers
//!
//! Rotating the key permanently orphans every value encrypted under the
//! previous one.

pub mod backup;
pub mod crypto;
pub mod error;
pub mod keystore;
pub mod provider;
pub mod store;
pub mod types;

pub use backup::{create_backup, restore_backup, verify_backup, Backup, BackupManifest};
pub use crypto::{CipherBox, MasterKey};
pub use error::{Result, SecretError};
pub use keystore::{KeyFileState, KeyStatus, KeyStore, RegenerationScope};
pub use provider::{AiSettings, Provider, SmtpCredentials, SmtpSettings};
pub use store::SecretConfig;
pub use types::{DecryptedSecret, SecretField};
