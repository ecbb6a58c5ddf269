//! Signing and verification
//!
//! Signatures travel in a self-delimiting DER form so a payload reader can
//! find them at the end of a scanned string:
//! - ECDSA: `SEQUENCE { INTEGER r, INTEGER s }`
//! - Ed25519: `OCTET STRING` of the 64 raw signature bytes

use p256::ecdsa::signature::{Signer, Verifier};
use std::fmt;

use super::keys::{PrivateKeyMaterial, PublicKeyMaterial};
use crate::error::{QrsavError, Result};
use crate::framing::{self, SignedPayload};
use crate::spec::{CipherSuite, SignatureAlgorithm, SignatureSpec};

/// DER header of an Ed25519 signature: OCTET STRING, 64 bytes
const ED25519_WIRE_HEADER: [u8; 2] = [0x04, 0x40];

/// Raw Ed25519 signature length
const ED25519_SIGNATURE_LEN: usize = 64;

/// An encoded signature, ready to be appended to a message
///
/// `Display` renders each byte as the character with the same code point
/// (ISO-8859-1), which survives a text-oriented barcode encoder intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEntity {
    algorithm: SignatureAlgorithm,
    encoded: Vec<u8>,
}

impl SignatureEntity {
    pub fn from_encoded(algorithm: SignatureAlgorithm, encoded: Vec<u8>) -> Self {
        Self { algorithm, encoded }
    }

    /// Rebuild from ISO-8859-1 text; `None` if any character is above U+00FF
    pub fn from_latin1(algorithm: SignatureAlgorithm, text: &str) -> Option<Self> {
        framing::latin1_bytes(text).map(|encoded| Self { algorithm, encoded })
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    pub fn len(&self) -> usize {
        self.encoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }
}

impl fmt::Display for SignatureEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encoded
            .iter()
            .try_for_each(|&b| fmt::Write::write_char(f, char::from(b)))
    }
}

/// Signs messages and verifies signatures under one cipher suite
#[derive(Debug, Clone)]
pub struct SignatureEngine {
    suite: CipherSuite,
}

impl SignatureEngine {
    pub fn new(spec: &SignatureSpec) -> Result<Self> {
        Ok(Self {
            suite: spec.suite()?,
        })
    }

    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Sign `message` with `key`
    ///
    /// ECDSA nonces are derived per RFC 6979; Ed25519 is deterministic by
    /// construction. Callers must not rely on either.
    pub fn sign(&self, message: &[u8], key: &PrivateKeyMaterial) -> Result<SignatureEntity> {
        if key.algorithm() != self.suite.key {
            return Err(QrsavError::KeyFormat(format!(
                "{} key cannot produce {} signatures",
                key.algorithm().name(),
                self.suite.signature.name()
            )));
        }

        let encoded = match key {
            PrivateKeyMaterial::EcP256(key) => {
                let signature: p256::ecdsa::Signature = key
                    .try_sign(message)
                    .map_err(|e| QrsavError::Signing(e.to_string()))?;
                signature.to_der().as_bytes().to_vec()
            }
            PrivateKeyMaterial::Ed25519(key) => {
                let signature: ed25519_dalek::Signature = key
                    .try_sign(message)
                    .map_err(|e| QrsavError::Signing(e.to_string()))?;
                let mut encoded = Vec::with_capacity(ED25519_WIRE_HEADER.len() + ED25519_SIGNATURE_LEN);
                encoded.extend_from_slice(&ED25519_WIRE_HEADER);
                encoded.extend_from_slice(&signature.to_bytes());
                encoded
            }
        };

        Ok(SignatureEntity::from_encoded(self.suite.signature, encoded))
    }

    /// Check `signature` over `message` against `key`
    ///
    /// Fails closed: any encoding problem or algorithm mismatch is `false`.
    pub fn verify(
        &self,
        signature: &SignatureEntity,
        message: &[u8],
        key: &PublicKeyMaterial,
    ) -> bool {
        if signature.algorithm() != self.suite.signature || key.algorithm() != self.suite.key {
            return false;
        }

        match key {
            PublicKeyMaterial::EcP256(key) => {
                match p256::ecdsa::Signature::from_der(signature.as_bytes()) {
                    Ok(sig) => key.verify(message, &sig).is_ok(),
                    Err(e) => {
                        tracing::debug!(error = %e, "undecodable ECDSA signature");
                        false
                    }
                }
            }
            PublicKeyMaterial::Ed25519(key) => {
                let Some(raw) = signature.as_bytes().strip_prefix(&ED25519_WIRE_HEADER[..]) else {
                    return false;
                };
                match ed25519_dalek::Signature::from_slice(raw) {
                    Ok(sig) => key.verify(message, &sig).is_ok(),
                    Err(e) => {
                        tracing::debug!(error = %e, "undecodable Ed25519 signature");
                        false
                    }
                }
            }
        }
    }

    /// Append a signature to a message, producing QR payload text
    pub fn frame(&self, message: &str, signature: &SignatureEntity) -> String {
        framing::frame(message, Some(signature))
    }

    /// Split scanned text into its message and optional signature
    pub fn get_content(&self, payload: &str) -> SignedPayload {
        framing::split(payload, self.suite.signature)
    }
}
