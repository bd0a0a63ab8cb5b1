//! AES-256-GCM encryption of configuration secrets.
//!
//! Blob format, fixed for compatibility with every stored value:
//!
//! ```text
//! lowercase-hex( nonce (12 bytes) || ciphertext || tag (16 bytes) )
//! ```
//!
//! 256-bit key, fresh random 96-bit nonce per call, 128-bit tag, no
//! associated data.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, SecretError};
use workitt_core::EncryptedBlob;

/// Master key length in bytes.
pub const KEY_SIZE: usize = 32;
/// Nonce length in bytes.
pub const NONCE_SIZE: usize = 12;
/// Authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;
/// Smallest decodable blob (empty plaintext).
pub const MIN_BLOB_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// A 256-bit master key, zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; KEY_SIZE],
}

impl MasterKey {
    /// Generate a new random key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Build a key from raw bytes; `None` unless exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().ok()?;
        Some(Self { bytes })
    }

    /// Raw key bytes, for writing the key file.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.bytes))
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// Stateless authenticated encryption over a [`MasterKey`].
pub struct CipherBox;

impl CipherBox {
    /// Encrypt `plaintext` under `key` with a fresh random nonce.
    pub fn encrypt(plaintext: &[u8], key: &MasterKey) -> Result<EncryptedBlob> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = key
            .cipher()
            .encrypt(&nonce, plaintext)
            .map_err(|_| SecretError::Encryption)?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);

        Ok(EncryptedBlob::from_encoded(hex::encode(blob)))
    }

    /// Decrypt a blob produced by [`CipherBox::encrypt`].
    ///
    /// Every failure (wrong key, tampering, truncation, bad encoding) is the
    /// same [`SecretError::AuthenticationFailed`].
    pub fn decrypt(blob: &EncryptedBlob, key: &MasterKey) -> Result<Zeroizing<Vec<u8>>> {
        let encoded = blob.as_encoded();
        // Only canonical lowercase hex, so every encoded bit is significant.
        if !encoded.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(SecretError::AuthenticationFailed);
        }
        let raw = hex::decode(encoded).map_err(|_| SecretError::AuthenticationFailed)?;
        if raw.len() < MIN_BLOB_SIZE {
            return Err(SecretError::AuthenticationFailed);
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_SIZE);
        key.cipher()
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| SecretError::AuthenticationFailed)
    }
}
