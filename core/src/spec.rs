//! Session configuration: which key algorithm, signature algorithm and
//! provider to use
//!
//! A [`SignatureSpec`] is built once from caller-supplied strings and never
//! mutated. Resolving it into a [`CipherSuite`] is where unsupported
//! combinations are rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QrsavError, Result};

/// Native provider name
pub const PROVIDER_RUSTCRYPTO: &str = "RustCrypto";

/// Provider name written by the Android application; served by the native implementation
pub const PROVIDER_BC_ALIAS: &str = "BC";

/// Immutable algorithm configuration for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSpec {
    key_algorithm: String,
    signature_algorithm: String,
    provider: String,
}

impl SignatureSpec {
    /// Build a spec, failing fast on any empty field
    pub fn new(
        key_algorithm: impl Into<String>,
        signature_algorithm: impl Into<String>,
        provider: impl Into<String>,
    ) -> Result<Self> {
        let spec = Self {
            key_algorithm: key_algorithm.into().trim().to_string(),
            signature_algorithm: signature_algorithm.into().trim().to_string(),
            provider: provider.into().trim().to_string(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// EC / SHA256withECDSA on the native provider
    pub fn ecdsa_p256() -> Self {
        Self {
            key_algorithm: "EC".to_string(),
            signature_algorithm: "SHA256withECDSA".to_string(),
            provider: PROVIDER_RUSTCRYPTO.to_string(),
        }
    }

    /// Ed25519 on the native provider
    pub fn ed25519() -> Self {
        Self {
            key_algorithm: "Ed25519".to_string(),
            signature_algorithm: "Ed25519".to_string(),
            provider: PROVIDER_RUSTCRYPTO.to_string(),
        }
    }

    /// Check that all three fields are present. Deserialized specs bypass
    /// [`SignatureSpec::new`], so consumers call this before use.
    pub fn validate(&self) -> Result<()> {
        if self.key_algorithm.is_empty() {
            return Err(QrsavError::Configuration("key algorithm"));
        }
        if self.signature_algorithm.is_empty() {
            return Err(QrsavError::Configuration("signature algorithm"));
        }
        if self.provider.is_empty() {
            return Err(QrsavError::Configuration("provider"));
        }
        Ok(())
    }

    pub fn key_algorithm(&self) -> &str {
        &self.key_algorithm
    }

    pub fn signature_algorithm(&self) -> &str {
        &self.signature_algorithm
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Lower-cased key algorithm as used in store file names
    pub fn storage_tag(&self) -> String {
        self.key_algorithm.to_lowercase()
    }

    /// Resolve the configured names into a concrete suite
    pub fn suite(&self) -> Result<CipherSuite> {
        self.validate()?;

        let provider = self.provider.as_str();
        if !(provider.eq_ignore_ascii_case(PROVIDER_RUSTCRYPTO)
            || provider.eq_ignore_ascii_case(PROVIDER_BC_ALIAS))
        {
            return Err(QrsavError::UnsupportedAlgorithm(format!(
                "provider '{}' is not available",
                provider
            )));
        }

        let key = KeyAlgorithm::parse(&self.key_algorithm)?;
        let signature = SignatureAlgorithm::parse(&self.signature_algorithm)?;

        if signature.key_algorithm() != key {
            return Err(QrsavError::UnsupportedAlgorithm(format!(
                "{} cannot be used with {} keys",
                self.signature_algorithm, self.key_algorithm
            )));
        }

        Ok(CipherSuite { key, signature })
    }
}

impl fmt::Display for SignatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({})",
            self.key_algorithm, self.signature_algorithm, self.provider
        )
    }
}

/// Asymmetric key families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// NIST P-256 (secp256r1)
    EcP256,
    Ed25519,
}

impl KeyAlgorithm {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ec" | "ecdsa" | "p-256" | "p256" | "secp256r1" => Ok(Self::EcP256),
            "ed25519" | "eddsa" => Ok(Self::Ed25519),
            _ => Err(QrsavError::UnsupportedAlgorithm(format!(
                "key algorithm '{}'",
                name
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::EcP256 => "EC (P-256)",
            Self::Ed25519 => "Ed25519",
        }
    }
}

/// Signature schemes, each tied to one key family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    Sha256WithEcdsa,
    Ed25519,
}

impl SignatureAlgorithm {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sha256withecdsa" => Ok(Self::Sha256WithEcdsa),
            "ed25519" | "eddsa" => Ok(Self::Ed25519),
            _ => Err(QrsavError::UnsupportedAlgorithm(format!(
                "signature algorithm '{}'",
                name
            ))),
        }
    }

    pub fn key_algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Sha256WithEcdsa => KeyAlgorithm::EcP256,
            Self::Ed25519 => KeyAlgorithm::Ed25519,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256WithEcdsa => "SHA256withECDSA",
            Self::Ed25519 => "Ed25519",
        }
    }
}

/// A resolved, internally consistent algorithm pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSuite {
    pub key: KeyAlgorithm,
    pub signature: SignatureAlgorithm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_rejected() {
        assert!(matches!(
            SignatureSpec::new("", "SHA256withECDSA", "BC"),
            Err(QrsavError::Configuration("key algorithm"))
        ));
        assert!(matches!(
            SignatureSpec::new("EC", "  ", "BC"),
            Err(QrsavError::Configuration("signature algorithm"))
        ));
        assert!(matches!(
            SignatureSpec::new("EC", "SHA256withECDSA", ""),
            Err(QrsavError::Configuration("provider"))
        ));
    }

    #[test]
    fn test_android_defaults_resolve() {
        let spec = SignatureSpec::new("EC", "SHA256withECDSA", "BC").unwrap();
        let suite = spec.suite().unwrap();
        assert_eq!(suite.key, KeyAlgorithm::EcP256);
        assert_eq!(suite.signature, SignatureAlgorithm::Sha256WithEcdsa);
        assert_eq!(spec.storage_tag(), "ec");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let spec = SignatureSpec::new("EC", "SHA256withECDSA", "SunPKCS11").unwrap();
        assert!(matches!(spec.suite(), Err(QrsavError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_mismatched_pairing_rejected() {
        let spec = SignatureSpec::new("Ed25519", "SHA256withECDSA", "RustCrypto").unwrap();
        assert!(matches!(spec.suite(), Err(QrsavError::UnsupportedAlgorithm(_))));

        let spec = SignatureSpec::new("RSA", "SHA256withRSA", "RustCrypto").unwrap();
        assert!(matches!(spec.suite(), Err(QrsavError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_deserialized_spec_is_validated() {
        let spec: SignatureSpec = serde_json::from_str(
            r#"{"key_algorithm":"EC","signature_algorithm":"","provider":"BC"}"#,
        )
        .unwrap();
        assert!(matches!(
            spec.validate(),
            Err(QrsavError::Configuration("signature algorithm"))
        ));
    }
}
