//! Binary key encodings for storage
//!
//! Public keys are DER SubjectPublicKeyInfo, private keys DER PKCS#8. Both
//! embed the algorithm identifier, so decoding only needs the expected
//! algorithm from the [`SignatureSpec`] to reject mismatched input.

use p256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::keys::{PrivateKeyMaterial, PublicKeyMaterial};
use crate::error::{QrsavError, Result};
use crate::spec::{KeyAlgorithm, SignatureSpec};

/// Encode a public key as DER SubjectPublicKeyInfo
pub fn encode_public(key: &PublicKeyMaterial) -> Result<Vec<u8>> {
    let document = match key {
        PublicKeyMaterial::EcP256(key) => key.to_public_key_der(),
        PublicKeyMaterial::Ed25519(key) => key.to_public_key_der(),
    }
    .map_err(|e| QrsavError::KeyFormat(format!("SPKI encode: {}", e)))?;

    Ok(document.into_vec())
}

/// Encode a private key as DER PKCS#8
///
/// The returned buffer is wiped on drop.
pub fn encode_private(key: &PrivateKeyMaterial) -> Result<Zeroizing<Vec<u8>>> {
    let document = match key {
        PrivateKeyMaterial::EcP256(key) => key.to_pkcs8_der(),
        PrivateKeyMaterial::Ed25519(key) => key.to_pkcs8_der(),
    }
    .map_err(|e| QrsavError::KeyFormat(format!("PKCS#8 encode: {}", e)))?;

    Ok(Zeroizing::new(document.as_bytes().to_vec()))
}

/// Decode a DER SubjectPublicKeyInfo for the configured key algorithm
pub fn decode_public(bytes: &[u8], spec: &SignatureSpec) -> Result<PublicKeyMaterial> {
    match spec.suite()?.key {
        KeyAlgorithm::EcP256 => p256::ecdsa::VerifyingKey::from_public_key_der(bytes)
            .map(PublicKeyMaterial::EcP256)
            .map_err(|e| QrsavError::KeyFormat(format!("EC public key: {}", e))),
        KeyAlgorithm::Ed25519 => ed25519_dalek::VerifyingKey::from_public_key_der(bytes)
            .map(PublicKeyMaterial::Ed25519)
            .map_err(|e| QrsavError::KeyFormat(format!("Ed25519 public key: {}", e))),
    }
}

/// Decode a DER PKCS#8 private key for the configured key algorithm
pub fn decode_private(bytes: &[u8], spec: &SignatureSpec) -> Result<PrivateKeyMaterial> {
    match spec.suite()?.key {
        KeyAlgorithm::EcP256 => p256::ecdsa::SigningKey::from_pkcs8_der(bytes)
            .map(PrivateKeyMaterial::EcP256)
            .map_err(|e| QrsavError::KeyFormat(format!("EC private key: {}", e))),
        KeyAlgorithm::Ed25519 => ed25519_dalek::SigningKey::from_pkcs8_der(bytes)
            .map(PrivateKeyMaterial::Ed25519)
            .map_err(|e| QrsavError::KeyFormat(format!("Ed25519 private key: {}", e))),
    }
}

/// SHA-256 over the SPKI encoding, hex encoded
pub fn fingerprint(key: &PublicKeyMaterial) -> Result<String> {
    let der = encode_public(key)?;
    Ok(hex::encode(Sha256::digest(&der)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    #[test]
    fn test_ec_roundtrip() {
        let spec = SignatureSpec::ecdsa_p256();
        let pair = KeyPair::generate(&spec).unwrap();

        let public = encode_public(&pair.public).unwrap();
        assert_eq!(decode_public(&public, &spec).unwrap(), pair.public);

        let private = encode_private(&pair.private).unwrap();
        let decoded = decode_private(&private, &spec).unwrap();
        assert_eq!(decoded.public_key(), pair.public);
        assert_eq!(*encode_private(&decoded).unwrap(), *private);
    }

    #[test]
    fn test_ed25519_roundtrip() {
        let spec = SignatureSpec::ed25519();
        let pair = KeyPair::generate(&spec).unwrap();

        let public = encode_public(&pair.public).unwrap();
        assert_eq!(decode_public(&public, &spec).unwrap(), pair.public);

        let private = encode_private(&pair.private).unwrap();
        let decoded = decode_private(&private, &spec).unwrap();
        assert_eq!(decoded.public_key(), pair.public);
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let ed_pair = KeyPair::generate(&SignatureSpec::ed25519()).unwrap();
        let public = encode_public(&ed_pair.public).unwrap();
        let private = encode_private(&ed_pair.private).unwrap();

        let ec_spec = SignatureSpec::ecdsa_p256();
        assert!(matches!(
            decode_public(&public, &ec_spec),
            Err(QrsavError::KeyFormat(_))
        ));
        assert!(matches!(
            decode_private(&private, &ec_spec),
            Err(QrsavError::KeyFormat(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let spec = SignatureSpec::ecdsa_p256();
        assert!(matches!(
            decode_public(b"not a key", &spec),
            Err(QrsavError::KeyFormat(_))
        ));
        assert!(matches!(decode_private(&[], &spec), Err(QrsavError::KeyFormat(_))));
    }

    #[test]
    fn test_fingerprint_stable() {
        let pair = KeyPair::generate(&SignatureSpec::ecdsa_p256()).unwrap();
        let a = fingerprint(&pair.public).unwrap();
        let b = fingerprint(&pair.public).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
