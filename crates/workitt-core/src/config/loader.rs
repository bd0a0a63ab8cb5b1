//! Configuration parsing, persistence, and validation.

use super::{AiPlatform, ConfigDocument};
use crate::error::ConfigError;
use std::fs;
use std::io::Write;
use std::path::Path;

impl ConfigDocument {
    /// Read the document at `path`, or `None` if the file does not exist.
    pub fn read_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }

    /// Parse a document from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Write the document to `path`, replacing any previous version.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = open_private(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Whether a master key has been recorded.
    pub fn is_key_configured(&self) -> bool {
        !self.security.master_key_path.is_empty()
    }

    /// Reset every encrypted field to unconfigured, keeping plain settings.
    pub fn clear_secrets(&mut self) {
        self.ai.api_key.clear();
        self.smtp.username.clear();
        self.smtp.password.clear();
    }

    /// Validate the document, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // 1. Key path and timestamp are recorded together
        if self.is_key_configured() && self.security.key_generated_at.is_none() {
            errors.push("Master key path is set but key_generated_at is missing".to_string());
        }

        // 2. Platform identifier
        match self.ai.parsed_platform() {
            Ok(Some(AiPlatform::Azure)) => {
                if self.ai.endpoint.as_deref().map_or(true, str::is_empty) {
                    errors.push("Azure platform requires an endpoint".to_string());
                }
                if self.ai.deployment.as_deref().map_or(true, str::is_empty) {
                    errors.push("Azure platform requires a deployment".to_string());
                }
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("AI platform: {}", e)),
        }

        // 3. SMTP port
        if self.smtp.port == 0 {
            errors.push("SMTP port cannot be 0".to_string());
        }

        // 4. SMTP credentials accompany a host
        if !self.smtp.host.is_empty()
            && !(self.smtp.username.is_configured() && self.smtp.password.is_configured())
        {
            errors.push("SMTP host is set but credentials are not configured".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Builder for assembling documents programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    doc: ConfigDocument,
}

impl ConfigBuilder {
    /// Create a new builder over the default document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AI platform.
    pub fn platform(mut self, platform: AiPlatform) -> Self {
        self.doc.ai.platform = platform.as_str().to_string();
        self
    }

    /// Set the model override.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.doc.ai.model = Some(model.into());
        self
    }

    /// Set the Azure endpoint and deployment.
    pub fn azure(mut self, endpoint: impl Into<String>, deployment: impl Into<String>) -> Self {
        self.doc.ai.endpoint = Some(endpoint.into());
        self.doc.ai.deployment = Some(deployment.into());
        self
    }

    /// Set the SMTP host and port.
    pub fn smtp_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.doc.smtp.host = host.into();
        self.doc.smtp.port = port;
        self
    }

    /// Enable or disable STARTTLS.
    pub fn smtp_tls(mut self, use_tls: bool) -> Self {
        self.doc.smtp.use_tls = use_tls;
        self
    }

    /// Build the document.
    pub fn build(self) -> ConfigDocument {
        self.doc
    }
}
