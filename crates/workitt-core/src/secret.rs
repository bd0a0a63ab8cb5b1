//! In-memory plaintext and at-rest ciphertext types.
//!
//! Neither type can print its contents: [`SecretString`] renders as
//! `[REDACTED]`, [`EncryptedBlob`] only as configured/not configured.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

const REDACTED: &str = "[REDACTED]";

/// Plaintext credential held in memory, wiped when dropped.
#[derive(Clone, Default)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The plaintext. Keep the borrow short.
    pub fn expose_secret(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

// Comparison time depends only on the lengths.
impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.0.as_bytes(), other.0.as_bytes());
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Persisted form of an encrypted secret: `hex(nonce || ciphertext || tag)`.
///
/// An empty blob means "not configured". The contents never appear in
/// `Debug` output and there is no `Display` impl; use
/// [`EncryptedBlob::is_configured`] for anything user-facing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EncryptedBlob(String);

impl EncryptedBlob {
    /// Wrap an already-encoded blob.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The unconfigured (empty) blob.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether a value has been stored.
    pub fn is_configured(&self) -> bool {
        !self.0.is_empty()
    }

    /// The encoded form, for the cipher and for persistence only.
    pub fn as_encoded(&self) -> &str {
        &self.0
    }

    /// Reset to the unconfigured state.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Debug for EncryptedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_configured() {
            f.write_str("EncryptedBlob([CONFIGURED])")
        } else {
            f.write_str("EncryptedBlob([NOT CONFIGURED])")
        }
    }
}

impl Serialize for EncryptedBlob {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EncryptedBlob {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Older documents may carry `null`; treat it as unconfigured.
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(Self(s.unwrap_or_default()))
    }
}
