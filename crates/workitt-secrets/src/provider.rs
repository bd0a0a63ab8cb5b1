//! Consumer views over decrypted credentials.
//!
//! A [`Provider`] is selected once per document load from the stored
//! platform identifier; consumers match on the variant instead of
//! dispatching on the string.

use crate::types::DecryptedSecret;
use workitt_core::config::AiPlatform;

/// Model used for OpenAI when none is configured.
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Azure OpenAI REST API version.
pub const AZURE_API_VERSION: &str = "2024-12-01-preview";

/// AI provider with its decrypted API key.
///
/// `Debug` is safe to log; the key prints as `[REDACTED]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    OpenAi {
        api_key: DecryptedSecret,
        model: String,
    },
    Azure {
        api_key: DecryptedSecret,
        endpoint: String,
        deployment: String,
        api_version: String,
    },
    DeepSeek {
        api_key: DecryptedSecret,
        model: Option<String>,
    },
    Anthropic {
        api_key: DecryptedSecret,
        model: Option<String>,
    },
    Gemini {
        api_key: DecryptedSecret,
        model: Option<String>,
    },
}

impl Provider {
    /// Platform this provider was built for.
    pub fn platform(&self) -> AiPlatform {
        match self {
            Self::OpenAi { .. } => AiPlatform::OpenAi,
            Self::Azure { .. } => AiPlatform::Azure,
            Self::DeepSeek { .. } => AiPlatform::DeepSeek,
            Self::Anthropic { .. } => AiPlatform::Anthropic,
            Self::Gemini { .. } => AiPlatform::Gemini,
        }
    }

    /// The decrypted API key.
    pub fn api_key(&self) -> &DecryptedSecret {
        match self {
            Self::OpenAi { api_key, .. }
            | Self::Azure { api_key, .. }
            | Self::DeepSeek { api_key, .. }
            | Self::Anthropic { api_key, .. }
            | Self::Gemini { api_key, .. } => api_key,
        }
    }

    /// Model name, where the platform takes one.
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::OpenAi { model, .. } => Some(model),
            Self::Azure { deployment, .. } => Some(deployment),
            Self::DeepSeek { model, .. }
            | Self::Anthropic { model, .. }
            | Self::Gemini { model, .. } => model.as_deref(),
        }
    }
}

/// Non-secret AI settings written alongside the API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub platform: AiPlatform,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
}

impl AiSettings {
    /// Settings for `platform` with nothing else set.
    pub fn new(platform: AiPlatform) -> Self {
        Self {
            platform,
            model: None,
            endpoint: None,
            deployment: None,
        }
    }

    /// Set the model override.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the Azure endpoint and deployment.
    pub fn with_azure(mut self, endpoint: impl Into<String>, deployment: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self.deployment = Some(deployment.into());
        self
    }
}

/// Non-secret mail transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
}

/// Everything a mail client needs to open one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: DecryptedSecret,
    pub password: DecryptedSecret,
}
