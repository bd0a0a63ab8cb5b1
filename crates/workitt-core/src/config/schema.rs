//! Configuration document schema.
//!
//! The document is a JSON object with three namespaces. Encrypted fields are
//! [`EncryptedBlob`]s and are empty strings when unconfigured:
//!
//! ```json
//! {
//!   "security": { "master_key_path": "", "key_generated_at": "" },
//!   "artificial_intelligence": { "platform": "", "api_key": "" },
//!   "smtp": { "host": "", "port": 587, "username": "", "password": "", "use_tls": true }
//! }
//! ```

use crate::secret::EncryptedBlob;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default SMTP submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Main Workitt configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Master key location and generation time.
    #[serde(default)]
    pub security: SecurityConfig,

    /// AI provider settings.
    #[serde(default, rename = "artificial_intelligence")]
    pub ai: AiConfig,

    /// Outbound mail settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// Security namespace.
///
/// Records where the key lives, never the key itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Path to the master key file; empty when no key has been generated.
    #[serde(default)]
    pub master_key_path: String,

    /// When the current key was generated.
    #[serde(
        default,
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub key_generated_at: Option<DateTime<Utc>>,
}

impl SecurityConfig {
    /// The recorded key path, if any.
    pub fn key_path(&self) -> Option<PathBuf> {
        if self.master_key_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.master_key_path))
        }
    }
}

/// AI provider namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Platform identifier (`openai`, `azure`, `deepseek`, `claudeai`, `gemini`).
    #[serde(default)]
    pub platform: String,

    /// Encrypted API key.
    #[serde(default)]
    pub api_key: EncryptedBlob,

    /// Azure endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Azure deployment name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    /// Model override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AiConfig {
    /// Parse the platform identifier; `None` when unset.
    pub fn parsed_platform(&self) -> Result<Option<AiPlatform>, UnknownPlatform> {
        if self.platform.is_empty() {
            return Ok(None);
        }
        self.platform.parse().map(Some)
    }
}

/// Supported AI platforms, by the identifier stored in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiPlatform {
    OpenAi,
    Azure,
    DeepSeek,
    Anthropic,
    Gemini,
}

impl AiPlatform {
    /// Every platform, in menu order.
    pub const ALL: [AiPlatform; 5] = [
        AiPlatform::DeepSeek,
        AiPlatform::OpenAi,
        AiPlatform::Anthropic,
        AiPlatform::Gemini,
        AiPlatform::Azure,
    ];

    /// Identifier written to the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Azure => "azure",
            Self::DeepSeek => "deepseek",
            Self::Anthropic => "claudeai",
            Self::Gemini => "gemini",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Azure => "Azure OpenAI",
            Self::DeepSeek => "DeepSeek",
            Self::Anthropic => "Claude",
            Self::Gemini => "Google Gemini",
        }
    }
}

impl fmt::Display for AiPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unrecognised platform identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported AI platform '{}'", self.0)
    }
}

impl std::error::Error for UnknownPlatform {}

impl FromStr for AiPlatform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AiPlatform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Mail transport namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server host; empty when mail is not configured.
    #[serde(default)]
    pub host: String,

    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Encrypted login name.
    #[serde(default)]
    pub username: EncryptedBlob,

    /// Encrypted password.
    #[serde(default)]
    pub password: EncryptedBlob,

    /// Upgrade the connection with STARTTLS.
    #[serde(default = "default_true")]
    pub use_tls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_SMTP_PORT,
            username: EncryptedBlob::empty(),
            password: EncryptedBlob::empty(),
            use_tls: true,
        }
    }
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_true() -> bool {
    true
}

// The timestamp is written as an empty string when unset so every field of
// the document stays a plain scalar.
fn serialize_timestamp<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    // Naive ISO-8601 without offset, as written by earlier setup tooling.
    chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let doc = ConfigDocument::default();
        assert!(doc.security.master_key_path.is_empty());
        assert!(doc.security.key_generated_at.is_none());
        assert!(doc.ai.platform.is_empty());
        assert!(!doc.ai.api_key.is_configured());
        assert_eq!(doc.smtp.port, 587);
        assert!(doc.smtp.use_tls);
        assert!(!doc.smtp.username.is_configured());
        assert!(!doc.smtp.password.is_configured());
    }

    #[test]
    fn test_default_serialization_shape() {
        let json = serde_json::to_value(ConfigDocument::default()).unwrap();
        assert_eq!(json["security"]["master_key_path"], "");
        assert_eq!(json["security"]["key_generated_at"], "");
        assert_eq!(json["artificial_intelligence"]["platform"], "");
        assert_eq!(json["artificial_intelligence"]["api_key"], "");
        assert!(json["artificial_intelligence"].get("endpoint").is_none());
        assert_eq!(json["smtp"]["port"], 587);
        assert_eq!(json["smtp"]["username"], "");
        assert_eq!(json["smtp"]["use_tls"], true);
    }

    #[test]
    fn test_missing_namespaces_fill_defaults() {
        let doc: ConfigDocument = serde_json::from_str(r#"{"smtp": {"host": "mail"}}"#).unwrap();
        assert_eq!(doc.smtp.host, "mail");
        assert_eq!(doc.smtp.port, 587);
        assert!(doc.smtp.use_tls);
        assert!(doc.ai.platform.is_empty());
    }

    #[test]
    fn test_naive_timestamp_accepted() {
        let doc: ConfigDocument = serde_json::from_str(
            r#"{"security": {"master_key_path": "data/key/.wm.key",
                "key_generated_at": "2025-01-02T03:04:05.123456"}}"#,
        )
        .unwrap();
        let ts = doc.security.key_generated_at.unwrap();
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2025-01-02");
        assert_eq!(
            doc.security.key_path(),
            Some(PathBuf::from("data/key/.wm.key"))
        );
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let mut doc = ConfigDocument::default();
        let now = Utc::now();
        doc.security.key_generated_at = Some(now);
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: ConfigDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.security.key_generated_at, Some(now));
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("openai".parse::<AiPlatform>(), Ok(AiPlatform::OpenAi));
        assert_eq!("Azure".parse::<AiPlatform>(), Ok(AiPlatform::Azure));
        assert_eq!("claudeai".parse::<AiPlatform>(), Ok(AiPlatform::Anthropic));
        assert!("watson".parse::<AiPlatform>().is_err());

        for platform in AiPlatform::ALL {
            assert_eq!(platform.as_str().parse::<AiPlatform>(), Ok(platform));
        }
    }

    #[test]
    fn test_ai_config_platform() {
        let mut ai = AiConfig::default();
        assert_eq!(ai.parsed_platform(), Ok(None));
        ai.platform = "gemini".to_string();
        assert_eq!(ai.parsed_platform(), Ok(Some(AiPlatform::Gemini)));
        ai.platform = "nope".to_string();
        assert!(ai.parsed_platform().is_err());
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let result: Result<ConfigDocument, _> =
            serde_json::from_str(r#"{"security": {"key_generated_at": "yesterday"}}"#);
        assert!(result.is_err());
    }
}
