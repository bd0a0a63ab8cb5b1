//! Field addressing and decrypted values.

use crate::error::{Result, SecretError};
use std::fmt;
use workitt_core::{ConfigDocument, EncryptedBlob, SecretString};

/// An encrypted field of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretField {
    /// `artificial_intelligence.api_key`
    AiApiKey,
    /// `smtp.username`
    SmtpUsername,
    /// `smtp.password`
    SmtpPassword,
}

impl SecretField {
    /// Every encrypted field.
    pub const ALL: [SecretField; 3] = [
        SecretField::AiApiKey,
        SecretField::SmtpUsername,
        SecretField::SmtpPassword,
    ];

    /// Look a field up by namespace and field name, e.g. `("smtp", "password")`.
    pub fn lookup(namespace: &str, field: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.namespace() == namespace && f.field() == field)
            .ok_or_else(|| SecretError::UnknownField(format!("{namespace}.{field}")))
    }

    /// Document namespace.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::AiApiKey => "artificial_intelligence",
            Self::SmtpUsername | Self::SmtpPassword => "smtp",
        }
    }

    /// Field name within the namespace.
    pub fn field(&self) -> &'static str {
        match self {
            Self::AiApiKey => "api_key",
            Self::SmtpUsername => "username",
            Self::SmtpPassword => "password",
        }
    }

    pub(crate) fn blob<'a>(&self, doc: &'a ConfigDocument) -> &'a EncryptedBlob {
        match self {
            Self::AiApiKey => &doc.ai.api_key,
            Self::SmtpUsername => &doc.smtp.username,
            Self::SmtpPassword => &doc.smtp.password,
        }
    }

    pub(crate) fn blob_mut<'a>(&self, doc: &'a mut ConfigDocument) -> &'a mut EncryptedBlob {
        match self {
            Self::AiApiKey => &mut doc.ai.api_key,
            Self::SmtpUsername => &mut doc.smtp.username,
            Self::SmtpPassword => &mut doc.smtp.password,
        }
    }
}

impl fmt::Display for SecretField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace(), self.field())
    }
}

/// Plaintext of one secret field, returned by a single `get_secret` call.
///
/// Wiped on drop; formats as `[REDACTED]`. Consumers read it with
/// [`expose`](Self::expose) at the point of use and let it drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DecryptedSecret(SecretString);

impl DecryptedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for DecryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for DecryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
