//! Deciding what a scanned payload means
//!
//! Each scan reaches exactly one terminal outcome; nothing carries over
//! between scans.

use serde::Serialize;
use std::fmt;

use crate::crypto::{PublicKeyMaterial, SignatureEngine};
use crate::framing::SignedPayload;

/// Result of checking a scanned payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// A stored public key verified the signature
    Verified,
    /// A signature was present and no stored key verified it
    Failed,
    /// The payload carried no signature; content is untrusted
    NoSignaturePresent,
    /// A signature was present but the store holds no public keys
    NoKeyAvailable,
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Failed and no-key both mean "signed, but not trusted" to a user
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::NoKeyAvailable)
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Verified => "signature verified",
            Self::Failed => "signature invalid",
            Self::NoSignaturePresent => "no signature",
            Self::NoKeyAvailable => "no public key available",
        };
        f.write_str(text)
    }
}

/// Try candidate keys in order and stop at the first that verifies
///
/// Which key wins when several would verify is not part of the contract.
pub fn evaluate(
    engine: &SignatureEngine,
    payload: &SignedPayload,
    candidates: &[PublicKeyMaterial],
) -> VerificationOutcome {
    let Some(signature) = payload.signature() else {
        return VerificationOutcome::NoSignaturePresent;
    };

    if candidates.is_empty() {
        return VerificationOutcome::NoKeyAvailable;
    }

    let message = payload.message_bytes();
    match candidates
        .iter()
        .position(|key| engine.verify(signature, message, key))
    {
        Some(index) => {
            tracing::debug!(index, tried = index + 1, "signature verified");
            VerificationOutcome::Verified
        }
        None => {
            tracing::debug!(tried = candidates.len(), "no candidate key verified");
            VerificationOutcome::Failed
        }
    }
}
