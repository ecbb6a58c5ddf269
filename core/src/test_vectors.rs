//! Known-answer vectors
//!
//! Pins the signature encodings and payload layout against published values:
//! - RFC 6979 A.2.5: P-256, SHA-256, message "sample"
//! - RFC 8032 section 7.1, test 1: Ed25519, empty message

#[cfg(test)]
#[allow(clippy::expect_fun_call)]
mod signature_test_vectors {
    use crate::crypto::{self, KeyPair, PrivateKeyMaterial, PublicKeyMaterial, SignatureEngine};
    use crate::framing;
    use crate::spec::{SignatureAlgorithm, SignatureSpec};

    const P256_SECRET: &str = "c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721";
    const P256_UX: &str = "60fed4ba255a9d31c961eb74c6356d68c049b8923b61fa6ce669622e60f29fb6";
    const P256_UY: &str = "7903fe1008b8bc99a41ae9e95628bc64f2f1b20c2d7e9f5177a3c294d4462299";
    const P256_SAMPLE_R: &str = "efd48b2aacb6a8fd1140dd9cd45e81d69d2c877b56aaf991c34d0ea84eaf3716";
    const P256_SAMPLE_S: &str = "f7cb1c942d657c41d436c7a1b6e29f65f3e900dbb9aff4064dc4ab2f843acda8";

    const ED25519_SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const ED25519_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const ED25519_EMPTY_SIG: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    fn p256_key() -> PrivateKeyMaterial {
        let secret = hex::decode(P256_SECRET).unwrap();
        PrivateKeyMaterial::EcP256(p256::ecdsa::SigningKey::from_slice(&secret).unwrap())
    }

    fn ed25519_key() -> PrivateKeyMaterial {
        let secret: [u8; 32] = hex::decode(ED25519_SECRET).unwrap().try_into().unwrap();
        PrivateKeyMaterial::Ed25519(ed25519_dalek::SigningKey::from_bytes(&secret))
    }

    /// DER form of the RFC 6979 (r, s): both have the high bit set, so each
    /// INTEGER carries a leading zero byte
    fn p256_sample_der() -> Vec<u8> {
        let mut der = vec![0x30, 0x46, 0x02, 0x21, 0x00];
        der.extend(hex::decode(P256_SAMPLE_R).unwrap());
        der.extend([0x02, 0x21, 0x00]);
        der.extend(hex::decode(P256_SAMPLE_S).unwrap());
        der
    }

    #[test]
    fn test_vector_p256_public_key() {
        let key = p256_key();
        let PublicKeyMaterial::EcP256(public) = key.public_key() else {
            panic!("expected an EC key");
        };
        let point = public.to_encoded_point(false);

        assert_eq!(hex::encode(point.x().unwrap()), P256_UX);
        assert_eq!(hex::encode(point.y().unwrap()), P256_UY);
    }

    #[test]
    fn test_vector_p256_sample_signature() {
        let engine = SignatureEngine::new(&SignatureSpec::ecdsa_p256()).unwrap();
        let key = p256_key();

        let signature = engine.sign(b"sample", &key).unwrap();
        assert_eq!(signature.as_bytes(), p256_sample_der().as_slice());
        assert_eq!(signature.len(), 72);
        assert!(engine.verify(&signature, b"sample", &key.public_key()));
    }

    #[test]
    fn test_vector_p256_payload_layout() {
        let engine = SignatureEngine::new(&SignatureSpec::ecdsa_p256()).unwrap();
        let signature = engine.sign(b"sample", &p256_key()).unwrap();
        let payload = engine.frame("sample", &signature);

        assert_eq!(payload.chars().count(), 6 + 72);
        assert!(payload.starts_with("sample0F\u{2}!\u{0}\u{ef}\u{d4}"));

        let parsed = engine.get_content(&payload);
        assert_eq!(parsed.message(), "sample");
        assert_eq!(parsed.signature().unwrap().as_bytes(), p256_sample_der().as_slice());
    }

    #[test]
    fn test_vector_p256_pkcs8_roundtrip() {
        let spec = SignatureSpec::ecdsa_p256();
        let pair = KeyPair::from_private(p256_key());

        let der = crypto::encode_private(&pair.private).unwrap();
        let decoded = crypto::decode_private(&der, &spec).unwrap();
        assert_eq!(decoded.public_key(), pair.public);

        let spki = crypto::encode_public(&pair.public).unwrap();
        // SEQUENCE, AlgorithmIdentifier(id-ecPublicKey, prime256v1), BIT STRING(04||X||Y)
        assert_eq!(spki.len(), 91);
        assert_eq!(hex::encode(&spki[spki.len() - 64..spki.len() - 32]), P256_UX);
    }

    #[test]
    fn test_vector_ed25519_public_key() {
        let key = ed25519_key();
        let PublicKeyMaterial::Ed25519(public) = key.public_key() else {
            panic!("expected an Ed25519 key");
        };
        assert_eq!(hex::encode(public.as_bytes()), ED25519_PUBLIC);
    }

    #[test]
    fn test_vector_ed25519_empty_message() {
        let engine = SignatureEngine::new(&SignatureSpec::ed25519()).unwrap();
        let key = ed25519_key();

        let signature = engine.sign(b"", &key).unwrap();
        assert_eq!(&signature.as_bytes()[..2], &[0x04, 0x40]);
        assert_eq!(hex::encode(&signature.as_bytes()[2..]), ED25519_EMPTY_SIG);

        let parsed = framing::split(&signature.to_string(), SignatureAlgorithm::Ed25519);
        assert_eq!(parsed.message(), "");
        assert!(engine.verify(parsed.signature().unwrap(), b"", &key.public_key()));
    }
}
