//! Key material and key pair generation
//!
//! Private keys zeroize on drop (both backends implement it) and are
//! deliberately kept out of `Debug` output.

use rand::rngs::OsRng;
use std::fmt;

use crate::error::Result;
use crate::spec::{KeyAlgorithm, SignatureSpec};

/// A signing key tagged with its algorithm
#[derive(Clone)]
pub enum PrivateKeyMaterial {
    EcP256(p256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl PrivateKeyMaterial {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::EcP256(_) => KeyAlgorithm::EcP256,
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
        }
    }

    /// Derive the matching public key
    pub fn public_key(&self) -> PublicKeyMaterial {
        match self {
            Self::EcP256(key) => PublicKeyMaterial::EcP256(*key.verifying_key()),
            Self::Ed25519(key) => PublicKeyMaterial::Ed25519(key.verifying_key()),
        }
    }
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKeyMaterial({}, <redacted>)", self.algorithm().name())
    }
}

/// A verifying key tagged with its algorithm
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKeyMaterial {
    EcP256(p256::ecdsa::VerifyingKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKeyMaterial {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::EcP256(_) => KeyAlgorithm::EcP256,
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
        }
    }
}

/// A freshly generated signing identity
///
/// Owned by the caller until handed to the key store.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private: PrivateKeyMaterial,
    pub public: PublicKeyMaterial,
}

impl KeyPair {
    /// Rebuild a pair from its private half
    pub fn from_private(private: PrivateKeyMaterial) -> Self {
        let public = private.public_key();
        Self { private, public }
    }

    /// One-shot generation for the configured key algorithm
    pub fn generate(spec: &SignatureSpec) -> Result<Self> {
        Ok(KeyPairGenerator::new(spec)?.generate())
    }
}

/// Produces key pairs for a resolved key algorithm
///
/// Construction is the only fallible step: once the suite has resolved,
/// generation draws from OS entropy and cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct KeyPairGenerator {
    algorithm: KeyAlgorithm,
}

impl KeyPairGenerator {
    pub fn new(spec: &SignatureSpec) -> Result<Self> {
        Ok(Self {
            algorithm: spec.suite()?.key,
        })
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn generate(&self) -> KeyPair {
        let mut rng = OsRng;
        let private = match self.algorithm {
            KeyAlgorithm::EcP256 => {
                PrivateKeyMaterial::EcP256(p256::ecdsa::SigningKey::random(&mut rng))
            }
            KeyAlgorithm::Ed25519 => {
                PrivateKeyMaterial::Ed25519(ed25519_dalek::SigningKey::generate(&mut rng))
            }
        };
        tracing::debug!(algorithm = self.algorithm.name(), "generated key pair");
        KeyPair::from_private(private)
    }
}
