//! Tests for the qrsav CLI
//!
//! Tests cover:
//! - Config file defaults, persistence and overrides
//! - Spec resolution from configuration
//! - Key file parsing for import
//! - Export/import between two configured stores

#[cfg(test)]
mod config_tests {
    use crate::config::{AppConfig, Overrides, DEFAULT_KEY_ALGORITHM, DEFAULT_PROVIDER};
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(config.key_algorithm, DEFAULT_KEY_ALGORITHM);
        assert_eq!(config.signature_algorithm, "SHA256withECDSA");
        assert_eq!(config.provider, DEFAULT_PROVIDER);
        assert!(config.data_dir.ends_with(".qrsav/data"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            key_algorithm: "Ed25519".to_string(),
            signature_algorithm: "Ed25519".to_string(),
            provider: "RustCrypto".to_string(),
            data_dir: dir.path().join("data"),
        };

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "provider": "BC" }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider, "BC");
        assert_eq!(config.key_algorithm, DEFAULT_KEY_ALGORITHM);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let merged = AppConfig::default().merge(Overrides {
            key_algorithm: Some("Ed25519".to_string()),
            signature_algorithm: Some("Ed25519".to_string()),
            provider: None,
            data_dir: Some(PathBuf::from("/tmp/qrsav-data")),
        });

        assert_eq!(merged.key_algorithm, "Ed25519");
        assert_eq!(merged.signature_algorithm, "Ed25519");
        assert_eq!(merged.provider, DEFAULT_PROVIDER);
        assert_eq!(merged.data_dir, PathBuf::from("/tmp/qrsav-data"));
    }

    #[test]
    fn test_empty_value_fails_fast() {
        let config = AppConfig::default().merge(Overrides {
            provider: Some("  ".to_string()),
            ..Overrides::default()
        });

        assert!(config.to_spec().is_err());
    }

    #[test]
    fn test_defaults_resolve_to_a_suite() {
        let spec = AppConfig::default().to_spec().unwrap();
        assert!(spec.suite().is_ok());
    }
}

#[cfg(test)]
mod command_tests {
    use crate::commands::sign::payload_line;
    use crate::commands::verify::{read_scanned_text, strip_line_ending};
    use crate::commands::{import::decode_hex_key, open_session};
    use crate::config::{AppConfig, Overrides};
    use qrsav_core::{crypto, VerificationOutcome};
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig::default().merge(Overrides {
            data_dir: Some(dir.to_path_buf()),
            ..Overrides::default()
        })
    }

    #[test]
    fn test_hex_key_with_whitespace() {
        assert_eq!(decode_hex_key(b"30 59\n01ff\n").unwrap(), vec![0x30, 0x59, 0x01, 0xff]);
        assert!(decode_hex_key(b"zz").is_err());
    }

    #[test]
    fn test_export_import_between_stores() {
        let alice_dir = tempdir().unwrap();
        let bob_dir = tempdir().unwrap();
        let alice = open_session(&config_in(alice_dir.path())).unwrap();
        let bob = open_session(&config_in(bob_dir.path())).unwrap();

        let payload = alice.generate_signed_payload("from alice").unwrap();
        assert_eq!(
            bob.process_scanned_text(&payload).outcome,
            VerificationOutcome::NoKeyAvailable
        );

        let exported = hex::encode(crypto::encode_public(&alice.signing_key().unwrap().public_key()).unwrap());
        let der = decode_hex_key(exported.as_bytes()).unwrap();
        bob.store().import_public_key(&der).unwrap();

        let report = bob.process_scanned_text(&payload);
        assert_eq!(report.outcome, VerificationOutcome::Verified);
        assert_eq!(report.display_text, "from alice");
    }

    #[test]
    fn test_sign_output_verifies_from_file() {
        let dir = tempdir().unwrap();
        let session = open_session(&config_in(&dir.path().join("data"))).unwrap();

        for signing in [true, false] {
            let payload = session.generate_payload("hello", signing).unwrap();
            let path = dir.path().join("payload.txt");
            std::fs::write(&path, payload_line(&payload)).unwrap();

            let scanned = read_scanned_text(None, Some(&path)).unwrap();
            assert_eq!(scanned, payload);

            let report = session.process_scanned_text(&scanned);
            let expected = if signing {
                VerificationOutcome::Verified
            } else {
                VerificationOutcome::NoSignaturePresent
            };
            assert_eq!(report.outcome, expected);
            assert_eq!(report.display_text, "hello");
        }
    }

    #[test]
    fn test_only_one_line_ending_is_stripped() {
        assert_eq!(strip_line_ending("abc\n".to_string()), "abc");
        assert_eq!(strip_line_ending("abc\n\n".to_string()), "abc\n");
        assert_eq!(strip_line_ending("abc\r".to_string()), "abc\r");
        assert_eq!(strip_line_ending("abc".to_string()), "abc");

        // A signature ending in 0x0A still survives the sign/verify line round trip
        let line = payload_line("msg\n");
        assert_eq!(strip_line_ending(line), "msg\n");
    }

    #[test]
    fn test_inline_text_is_taken_verbatim() {
        let text = read_scanned_text(Some("abc\n".to_string()), None).unwrap();
        assert_eq!(text, "abc\n");
    }

    #[test]
    fn test_unsupported_suite_fails_to_open() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path()).merge(Overrides {
            provider: Some("SunEC".to_string()),
            ..Overrides::default()
        });

        assert!(open_session(&config).is_err());
    }
}
