//! Display-only view of the configuration document.
//!
//! [`MaskedConfig`] is the only form of the document meant for terminals,
//! logs, and API responses. Every encrypted field is reduced to a
//! configured/not-configured marker; ciphertext is never copied into it.

use super::ConfigDocument;
use crate::secret::EncryptedBlob;
use serde::Serialize;
use std::fmt;

/// Marker shown for a stored secret.
pub const CONFIGURED: &str = "[CONFIGURED]";

/// Marker shown for an absent secret or setting.
pub const NOT_CONFIGURED: &str = "[NOT CONFIGURED]";

/// Masked snapshot of a [`ConfigDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedConfig {
    pub security: MaskedSecurity,
    pub artificial_intelligence: MaskedAi,
    pub smtp: MaskedSmtp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedSecurity {
    pub master_key_path: String,
    pub key_generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedAi {
    pub platform: String,
    pub api_key: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedSmtp {
    pub host: String,
    pub port: u16,
    pub username: &'static str,
    pub password: &'static str,
    pub use_tls: bool,
}

fn mark(blob: &EncryptedBlob) -> &'static str {
    if blob.is_configured() {
        CONFIGURED
    } else {
        NOT_CONFIGURED
    }
}

fn or_marker(value: &str) -> String {
    if value.is_empty() {
        NOT_CONFIGURED.to_string()
    } else {
        value.to_string()
    }
}

impl From<&ConfigDocument> for MaskedConfig {
    fn from(doc: &ConfigDocument) -> Self {
        Self {
            security: MaskedSecurity {
                master_key_path: or_marker(&doc.security.master_key_path),
                key_generated_at: doc
                    .security
                    .key_generated_at
                    .map(|ts| ts.to_rfc3339())
                    .unwrap_or_else(|| NOT_CONFIGURED.to_string()),
            },
            artificial_intelligence: MaskedAi {
                platform: or_marker(&doc.ai.platform),
                api_key: mark(&doc.ai.api_key),
                endpoint: doc.ai.endpoint.clone(),
                deployment: doc.ai.deployment.clone(),
                model: doc.ai.model.clone(),
            },
            smtp: MaskedSmtp {
                host: or_marker(&doc.smtp.host),
                port: doc.smtp.port,
                username: mark(&doc.smtp.username),
                password: mark(&doc.smtp.password),
                use_tls: doc.smtp.use_tls,
            },
        }
    }
}

impl ConfigDocument {
    /// Masked view for display.
    pub fn masked(&self) -> MaskedConfig {
        MaskedConfig::from(self)
    }
}

impl fmt::Display for MaskedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Security:")?;
        writeln!(f, "  Key path: {}", self.security.master_key_path)?;
        writeln!(f, "  Generated: {}", self.security.key_generated_at)?;

        let ai = &self.artificial_intelligence;
        writeln!(f, "AI:")?;
        writeln!(f, "  Platform: {}", ai.platform)?;
        writeln!(f, "  API Key: {}", ai.api_key)?;
        if let Some(endpoint) = &ai.endpoint {
            writeln!(f, "  Endpoint: {}", endpoint)?;
        }
        if let Some(deployment) = &ai.deployment {
            writeln!(f, "  Deployment: {}", deployment)?;
        }
        if let Some(model) = &ai.model {
            writeln!(f, "  Model: {}", model)?;
        }

        writeln!(f, "SMTP:")?;
        writeln!(f, "  Host: {}", self.smtp.host)?;
        writeln!(f, "  Port: {}", self.smtp.port)?;
        writeln!(f, "  Username: {}", self.smtp.username)?;
        writeln!(f, "  Password: {}", self.smtp.password)?;
        write!(f, "  Use TLS: {}", self.smtp.use_tls)
    }
}
