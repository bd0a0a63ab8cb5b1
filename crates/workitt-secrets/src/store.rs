//! Field-level encryption over the configuration document.
//!
//! [`SecretConfig`] stores ciphertext, never plaintext, in the document and
//! decrypts on demand. The key is resolved from the document passed in, so
//! every method works inside [`SecretConfig::update`], which is how writers
//! that may race with a key rotation should mutate the document.

use std::path::Path;
use tracing::{debug, warn};

use crate::crypto::{CipherBox, MasterKey};
use crate::error::{Result, SecretError};
use crate::keystore::KeyStore;
use crate::provider::{
    AiSettings, Provider, SmtpCredentials, SmtpSettings, AZURE_API_VERSION, OPENAI_DEFAULT_MODEL,
};
use crate::types::{DecryptedSecret, SecretField};
use workitt_core::config::AiPlatform;
use workitt_core::{ConfigDocument, ConfigHandle, EncryptedBlob, MaskedConfig};

/// Typed encrypt-on-write / decrypt-on-read access to the document.
#[derive(Debug, Clone)]
pub struct SecretConfig {
    config: ConfigHandle,
    keys: KeyStore,
}

impl SecretConfig {
    /// Wrap a configuration handle.
    pub fn new(config: ConfigHandle) -> Self {
        let keys = KeyStore::new(config.clone());
        Self { config, keys }
    }

    /// File-backed configuration under `data_dir`.
    pub fn open(data_dir: &Path) -> Self {
        Self::new(ConfigHandle::open(data_dir))
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Load the document, creating the defaults if absent.
    pub fn load(&self) -> Result<ConfigDocument> {
        Ok(self.config.load()?)
    }

    /// Overwrite the stored document.
    pub fn save(&self, doc: &ConfigDocument) -> Result<()> {
        Ok(self.config.save(doc)?)
    }

    /// Read-modify-write of the stored document under the exclusive lock.
    ///
    /// `f` sees the latest stored document, including any key rotation
    /// committed before the lock was taken; it is saved only if `f`
    /// succeeds.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ConfigDocument) -> Result<T>,
    {
        self.config.update(f)
    }

    /// Encrypt `plaintext` into `field` of the in-memory document.
    ///
    /// An empty plaintext clears the field.
    pub fn put_secret(
        &self,
        doc: &mut ConfigDocument,
        field: SecretField,
        plaintext: &str,
    ) -> Result<()> {
        if plaintext.is_empty() {
            field.blob_mut(doc).clear();
            debug!(field = %field, "cleared secret");
            return Ok(());
        }

        let key = KeyStore::key_for(doc)?;
        *field.blob_mut(doc) = CipherBox::encrypt(plaintext.as_bytes(), &key)?;
        debug!(field = %field, "stored secret");
        Ok(())
    }

    /// [`put_secret`](Self::put_secret) addressed by namespace and field name.
    pub fn put(
        &self,
        doc: &mut ConfigDocument,
        namespace: &str,
        field: &str,
        plaintext: &str,
    ) -> Result<()> {
        self.put_secret(doc, SecretField::lookup(namespace, field)?, plaintext)
    }

    /// Decrypt `field` of the document.
    ///
    /// Fails with `KeyNotConfigured` before anything else when no key has
    /// been generated, then `SecretNotConfigured` for an empty field.
    pub fn get_secret(&self, doc: &ConfigDocument, field: SecretField) -> Result<DecryptedSecret> {
        let key = KeyStore::key_for(doc)?;
        decrypt_field(doc, field, &key)
    }

    /// [`get_secret`](Self::get_secret) addressed by namespace and field name.
    pub fn get(&self, doc: &ConfigDocument, namespace: &str, field: &str) -> Result<DecryptedSecret> {
        self.get_secret(doc, SecretField::lookup(namespace, field)?)
    }

    /// Record the AI platform settings and encrypt its API key.
    ///
    /// The document is left untouched on failure.
    pub fn set_ai_credential(
        &self,
        doc: &mut ConfigDocument,
        settings: &AiSettings,
        api_key: &str,
    ) -> Result<()> {
        if settings.platform == AiPlatform::Azure {
            require(settings.endpoint.as_deref(), "artificial_intelligence.endpoint")?;
            require(settings.deployment.as_deref(), "artificial_intelligence.deployment")?;
        }
        let blob = encrypt_required(doc, api_key, "artificial_intelligence.api_key")?;

        let ai = &mut doc.ai;
        ai.platform = settings.platform.as_str().to_string();
        ai.api_key = blob;
        ai.model = settings.model.clone().filter(|m| !m.is_empty());
        ai.endpoint = settings.endpoint.clone().filter(|e| !e.is_empty());
        ai.deployment = settings.deployment.clone().filter(|d| !d.is_empty());

        debug!(platform = %settings.platform, "stored AI credential");
        Ok(())
    }

    /// Build the provider for the configured platform.
    pub fn ai_provider(&self, doc: &ConfigDocument) -> Result<Provider> {
        let platform = doc
            .ai
            .parsed_platform()
            .map_err(|e| SecretError::UnsupportedPlatform(e.0))?
            .ok_or(SecretError::Incomplete("artificial_intelligence.platform"))?;

        let key = KeyStore::key_for(doc)?;
        let api_key = decrypt_field(doc, SecretField::AiApiKey, &key)?;
        drop(key);

        let model = doc.ai.model.clone().filter(|m| !m.is_empty());
        let provider = match platform {
            AiPlatform::OpenAi => Provider::OpenAi {
                api_key,
                model: model.unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
            },
            AiPlatform::Azure => Provider::Azure {
                api_key,
                endpoint: require(doc.ai.endpoint.as_deref(), "artificial_intelligence.endpoint")?,
                deployment: require(
                    doc.ai.deployment.as_deref(),
                    "artificial_intelligence.deployment",
                )?,
                api_version: AZURE_API_VERSION.to_string(),
            },
            AiPlatform::DeepSeek => Provider::DeepSeek { api_key, model },
            AiPlatform::Anthropic => Provider::Anthropic { api_key, model },
            AiPlatform::Gemini => Provider::Gemini { api_key, model },
        };
        Ok(provider)
    }

    /// Record the mail server and encrypt its login.
    ///
    /// The document is left untouched on failure.
    pub fn set_smtp(
        &self,
        doc: &mut ConfigDocument,
        settings: &SmtpSettings,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let host = require(Some(settings.host.as_str()), "smtp.host")?;
        if settings.port == 0 {
            return Err(SecretError::Incomplete("smtp.port"));
        }
        let username = encrypt_required(doc, username, "smtp.username")?;
        let password = encrypt_required(doc, password, "smtp.password")?;

        let smtp = &mut doc.smtp;
        smtp.host = host;
        smtp.port = settings.port;
        smtp.use_tls = settings.use_tls;
        smtp.username = username;
        smtp.password = password;

        debug!(host = %smtp.host, port = smtp.port, "stored SMTP credentials");
        Ok(())
    }

    /// Decrypt everything a mail client needs for one session.
    pub fn smtp_credentials(&self, doc: &ConfigDocument) -> Result<SmtpCredentials> {
        let host = require(Some(doc.smtp.host.as_str()), "smtp.host")?;
        let key = KeyStore::key_for(doc)?;

        Ok(SmtpCredentials {
            host,
            port: doc.smtp.port,
            use_tls: doc.smtp.use_tls,
            username: decrypt_field(doc, SecretField::SmtpUsername, &key)?,
            password: decrypt_field(doc, SecretField::SmtpPassword, &key)?,
        })
    }

    /// Display-only view with every secret masked.
    pub fn masked(&self, doc: &ConfigDocument) -> MaskedConfig {
        doc.masked()
    }
}

fn encrypt_required(
    doc: &ConfigDocument,
    plaintext: &str,
    name: &'static str,
) -> Result<EncryptedBlob> {
    if plaintext.is_empty() {
        return Err(SecretError::Incomplete(name));
    }
    let key = KeyStore::key_for(doc)?;
    CipherBox::encrypt(plaintext.as_bytes(), &key)
}

fn decrypt_field(
    doc: &ConfigDocument,
    field: SecretField,
    key: &MasterKey,
) -> Result<DecryptedSecret> {
    let blob = field.blob(doc);
    if !blob.is_configured() {
        return Err(SecretError::SecretNotConfigured(field));
    }

    let plaintext = CipherBox::decrypt(blob, key).map_err(|e| {
        warn!(field = %field, "secret failed authentication");
        e
    })?;
    let text = std::str::from_utf8(&plaintext).map_err(|_| SecretError::InvalidEncoding)?;
    Ok(DecryptedSecret::new(text))
}

fn require(value: Option<&str>, name: &'static str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SecretError::Incomplete(name)),
    }
}
