//! Config save/load roundtrip integration tests.
//!
//! These tests verify that the configuration document can be written to
//! disk and loaded back with identical field values, including documents
//! written by earlier setup tooling.

use std::path::Path;
use tempfile::TempDir;
use workitt_core::config::{AiPlatform, ConfigBuilder};
use workitt_core::{ConfigDocument, ConfigHandle};
use workitt_integration_tests::{keyed_data_dir, reopen};
use workitt_secrets::SecretField;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let config = ConfigDocument::default();
    config.write_to(&path).unwrap();

    let loaded = ConfigDocument::read_from(&path).unwrap().unwrap();
    assert_eq!(loaded, config);
    // Default port should survive the roundtrip
    assert_eq!(loaded.smtp.port, 587);
    assert!(loaded.smtp.use_tls);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let handle = ConfigHandle::open(dir.path());

    let doc = ConfigBuilder::new()
        .platform(AiPlatform::Azure)
        .azure("https://example.openai.azure.com", "gpt4o")
        .smtp_server("smtp.example.com", 465)
        .smtp_tls(false)
        .build();
    handle.save(&doc).unwrap();

    let loaded = ConfigHandle::open(dir.path()).load().unwrap();
    assert_eq!(loaded, doc);
    assert_eq!(loaded.ai.deployment.as_deref(), Some("gpt4o"));
    assert_eq!(loaded.smtp.port, 465);
}

#[test]
fn test_config_load_nonexistent() {
    let result = ConfigDocument::read_from(Path::new("/nonexistent/config.json")).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_config_parse_invalid() {
    let result = ConfigDocument::parse("not valid json");
    assert!(result.is_err());
}

#[test]
fn test_legacy_document_is_readable() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{
            "security": {
                "master_key_path": "data/key/.wm.key",
                "key_generated_at": "2024-11-05T09:30:12.345678"
            },
            "artificial_intelligence": { "platform": "deepseek", "api_key": "" },
            "smtp": { "host": "", "port": 587, "username": "", "password": "", "use_tls": true }
        }"#,
    )
    .unwrap();

    let doc = ConfigHandle::open(dir.path()).load().unwrap();
    assert!(doc.is_key_configured());
    assert!(doc.security.key_generated_at.is_some());
    assert_eq!(doc.ai.parsed_platform(), Ok(Some(AiPlatform::DeepSeek)));
    doc.validate().unwrap();
}

#[test]
fn test_secrets_roundtrip_through_file() {
    let dir = keyed_data_dir();
    let secrets = reopen(dir.path());

    let mut doc = secrets.load().unwrap();
    secrets
        .put_secret(&mut doc, SecretField::SmtpUsername, "alice")
        .unwrap();
    secrets.save(&doc).unwrap();

    let reloaded = reopen(dir.path()).load().unwrap();
    assert_eq!(reloaded, doc);
    assert_eq!(
        reopen(dir.path())
            .get_secret(&reloaded, SecretField::SmtpUsername)
            .unwrap()
            .expose(),
        "alice"
    );
}
