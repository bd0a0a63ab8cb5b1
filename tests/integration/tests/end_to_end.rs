//! End-to-end secret lifecycle tests.
//!
//! Each scenario goes through the public API only and reopens the data
//! directory between steps, the way separate processes would.

use workitt_integration_tests::{empty_data_dir, keyed_data_dir, reopen};
use workitt_secrets::{CipherBox, KeyStore, SecretError, SecretField};

#[test]
fn test_smtp_password_survives_reload() {
    let dir = empty_data_dir();

    // 1. generate a key
    let secrets = reopen(dir.path());
    secrets.keys().generate().unwrap();

    // 2-3. store and save
    let mut doc = secrets.load().unwrap();
    secrets.put(&mut doc, "smtp", "password", "hunter2").unwrap();
    secrets.save(&doc).unwrap();

    // 4-5. reload in a new instance and read back
    let fresh = reopen(dir.path());
    let doc = fresh.load().unwrap();
    assert_eq!(fresh.get(&doc, "smtp", "password").unwrap().expose(), "hunter2");
}

#[test]
fn test_rotation_after_save_fails_authentication() {
    let dir = empty_data_dir();
    let secrets = reopen(dir.path());
    secrets.keys().generate().unwrap();

    let mut doc = secrets.load().unwrap();
    secrets.put(&mut doc, "smtp", "password", "hunter2").unwrap();
    secrets.save(&doc).unwrap();

    // A process holding the document loaded before rotation.
    let stale = reopen(dir.path()).load().unwrap();

    reopen(dir.path()).keys().generate().unwrap();

    let fresh = reopen(dir.path());
    let err = fresh.get(&stale, "smtp", "password").unwrap_err();
    assert!(matches!(err, SecretError::AuthenticationFailed));
    assert!(err.is_unavailable());
    assert_eq!(err.public_message(), "secret unavailable");
}

#[test]
fn test_locked_write_cannot_resurrect_rotated_secrets() {
    let dir = keyed_data_dir();
    let setup = reopen(dir.path());
    setup
        .update(|doc| setup.put(doc, "smtp", "password", "hunter2"))
        .unwrap();

    // A writer that read the document, then a rotation from elsewhere.
    let writer = reopen(dir.path());
    let _seen = writer.load().unwrap();
    reopen(dir.path()).keys().generate().unwrap();

    writer
        .update(|doc| writer.put(doc, "artificial_intelligence", "api_key", "sk-1"))
        .unwrap();

    let fresh = reopen(dir.path());
    let doc = fresh.load().unwrap();
    assert!(matches!(
        fresh.get(&doc, "smtp", "password"),
        Err(SecretError::SecretNotConfigured(SecretField::SmtpPassword))
    ));
    assert_eq!(
        fresh.get(&doc, "artificial_intelligence", "api_key").unwrap().expose(),
        "sk-1"
    );
    assert_eq!(fresh.masked(&doc).smtp.password, "[NOT CONFIGURED]");
}

#[test]
fn test_rotation_orphans_every_previous_blob() {
    let dir = keyed_data_dir();
    let keys = KeyStore::new(reopen(dir.path()).config().clone());

    let old_key = keys.current().unwrap();
    let blobs: Vec<_> = ["a", "bb", "a much longer secret value"]
        .iter()
        .map(|p| CipherBox::encrypt(p.as_bytes(), &old_key).unwrap())
        .collect();

    keys.generate().unwrap();
    let new_key = keys.current().unwrap();
    for blob in &blobs {
        assert!(matches!(
            CipherBox::decrypt(blob, &new_key),
            Err(SecretError::AuthenticationFailed)
        ));
    }
}

#[test]
fn test_get_without_key_is_key_not_configured() {
    let dir = empty_data_dir();
    let secrets = reopen(dir.path());
    let doc = secrets.load().unwrap();

    for field in SecretField::ALL {
        assert!(matches!(
            secrets.get_secret(&doc, field),
            Err(SecretError::KeyNotConfigured)
        ));
    }
}

#[test]
fn test_deleted_key_file_is_key_file_missing() {
    let dir = keyed_data_dir();
    let secrets = reopen(dir.path());
    let mut doc = secrets.load().unwrap();
    secrets
        .put_secret(&mut doc, SecretField::AiApiKey, "sk-test")
        .unwrap();
    secrets.save(&doc).unwrap();

    std::fs::remove_dir_all(dir.path().join("key")).unwrap();

    let fresh = reopen(dir.path());
    let doc = fresh.load().unwrap();
    let err = fresh.get_secret(&doc, SecretField::AiApiKey).unwrap_err();
    assert!(matches!(err, SecretError::KeyFileMissing { .. }));
    assert_eq!(err.public_message(), "secret unavailable");
}

#[test]
fn test_document_holds_only_ciphertext() {
    let dir = keyed_data_dir();
    let secrets = reopen(dir.path());
    let mut doc = secrets.load().unwrap();
    secrets.put(&mut doc, "smtp", "username", "alice").unwrap();
    secrets.put(&mut doc, "smtp", "password", "hunter2").unwrap();
    secrets.save(&doc).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(!raw.contains("alice"));
    assert!(!raw.contains("hunter2"));

    let key = std::fs::read(dir.path().join("key").join(".wm.key")).unwrap();
    let key_hex: String = key.iter().map(|b| format!("{b:02x}")).collect();
    assert!(!raw.contains(&key_hex));

    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let blob = value["smtp"]["password"].as_str().unwrap();
    // hex(12-byte nonce || 7-byte ciphertext || 16-byte tag)
    assert_eq!(blob.len(), 2 * (12 + 7 + 16));
    assert!(blob.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
}

#[cfg(unix)]
#[test]
fn test_separate_handles_do_not_lose_updates() {
    let dir = keyed_data_dir();

    // Independent handles share nothing in memory; only the file lock
    // serialises them.
    let writers: Vec<_> = (0..4)
        .map(|_| {
            let path = dir.path().to_path_buf();
            std::thread::spawn(move || {
                let secrets = reopen(&path);
                for _ in 0..10 {
                    secrets
                        .config()
                        .update(|doc| -> Result<(), SecretError> {
                            doc.smtp.port += 1;
                            Ok(())
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for w in writers {
        w.join().unwrap();
    }

    let doc = reopen(dir.path()).load().unwrap();
    assert_eq!(doc.smtp.port, 587 + 40);
}
