//! QR payload framing
//!
//! A signed payload is `<UTF-8 message><signature as ISO-8859-1 chars>` with
//! no delimiter. Signatures are DER values whose outer length covers exactly
//! the rest of the payload, so the split point is found from the tail:
//! candidate suffixes are tried longest first and the first structurally
//! valid one wins.
//!
//! For ECDSA a longer spurious match is impossible: it would need an INTEGER
//! header inside the message whose content spans the whole real signature,
//! and no P-256 integer is that long.

use crate::crypto::SignatureEntity;
use crate::spec::SignatureAlgorithm;

/// Largest DER INTEGER content for a P-256 scalar (32 bytes plus a sign pad)
const P256_MAX_INTEGER_LEN: usize = 33;

/// Shortest DER ECDSA signature: `30 06 02 01 r 02 01 s`
const ECDSA_MIN_DER_LEN: usize = 8;

/// Longest DER ECDSA signature over P-256
const ECDSA_MAX_DER_LEN: usize = 2 + 2 * (2 + P256_MAX_INTEGER_LEN);

/// `04 40` followed by 64 signature bytes
const ED25519_WIRE_LEN: usize = 66;

const DER_TAG_SEQUENCE: u8 = 0x30;
const DER_TAG_INTEGER: u8 = 0x02;
const DER_TAG_OCTET_STRING: u8 = 0x04;

/// A scanned payload split into message and optional signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    message: String,
    signature: Option<SignatureEntity>,
}

impl SignedPayload {
    pub fn unsigned(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            signature: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message bytes as they were signed (UTF-8)
    pub fn message_bytes(&self) -> &[u8] {
        self.message.as_bytes()
    }

    pub fn signature(&self) -> Option<&SignatureEntity> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// 2 when a signature suffix was found, 1 otherwise
    pub fn part_count(&self) -> usize {
        if self.is_signed() {
            2
        } else {
            1
        }
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

/// Render a payload: the message followed by the signature's ISO-8859-1 text
pub fn frame(message: &str, signature: Option<&SignatureEntity>) -> String {
    match signature {
        Some(signature) => {
            let mut payload = String::with_capacity(message.len() + 2 * signature.len());
            payload.push_str(message);
            payload.push_str(&signature.to_string());
            payload
        }
        None => message.to_string(),
    }
}

/// Locate a signature-shaped suffix for `algorithm` and split on it
///
/// Without one, the whole text is the message.
pub fn split(payload: &str, algorithm: SignatureAlgorithm) -> SignedPayload {
    let starts: Vec<usize> = payload.char_indices().map(|(i, _)| i).collect();
    let total = starts.len();
    let (min_len, max_len) = suffix_len_range(algorithm);

    if total < min_len {
        return SignedPayload::unsigned(payload);
    }

    for len in (min_len..=max_len.min(total)).rev() {
        let boundary = starts[total - len];
        let tail = &payload[boundary..];

        let Some(bytes) = latin1_bytes(tail) else {
            continue;
        };

        if is_signature_shaped(algorithm, &bytes) {
            return SignedPayload {
                message: payload[..boundary].to_string(),
                signature: Some(SignatureEntity::from_encoded(algorithm, bytes)),
            };
        }
    }

    SignedPayload::unsigned(payload)
}

/// Bytes of `text` read as ISO-8859-1; `None` if any char is above U+00FF
pub fn latin1_bytes(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(c).ok()).collect()
}

fn suffix_len_range(algorithm: SignatureAlgorithm) -> (usize, usize) {
    match algorithm {
        SignatureAlgorithm::Sha256WithEcdsa => (ECDSA_MIN_DER_LEN, ECDSA_MAX_DER_LEN),
        SignatureAlgorithm::Ed25519 => (ED25519_WIRE_LEN, ED25519_WIRE_LEN),
    }
}

/// Structural check only; scalar ranges are the verifier's concern
fn is_signature_shaped(algorithm: SignatureAlgorithm, bytes: &[u8]) -> bool {
    match algorithm {
        SignatureAlgorithm::Sha256WithEcdsa => is_der_integer_pair(bytes),
        SignatureAlgorithm::Ed25519 => {
            bytes.len() == ED25519_WIRE_LEN
                && bytes[0] == DER_TAG_OCTET_STRING
                && usize::from(bytes[1]) == ED25519_WIRE_LEN - 2
        }
    }
}

/// `SEQUENCE { INTEGER, INTEGER }` with short-form lengths consuming all of `bytes`
fn is_der_integer_pair(bytes: &[u8]) -> bool {
    if bytes.len() < ECDSA_MIN_DER_LEN
        || bytes[0] != DER_TAG_SEQUENCE
        || usize::from(bytes[1]) != bytes.len() - 2
    {
        return false;
    }

    let mut rest = &bytes[2..];
    for _ in 0..2 {
        if rest.len() < 2 || rest[0] != DER_TAG_INTEGER {
            return false;
        }
        let len = usize::from(rest[1]);
        if len == 0 || len > P256_MAX_INTEGER_LEN || rest.len() < 2 + len {
            return false;
        }
        rest = &rest[2 + len..];
    }

    rest.is_empty()
}
