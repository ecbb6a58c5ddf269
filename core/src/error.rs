//! Error taxonomy for key handling, signing and storage
//!
//! Verification failure is not an error: it is reported through
//! [`crate::VerificationOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// QR code capacity in bytes (version 40, error correction L, byte mode)
pub const PAYLOAD_CAPACITY_BYTES: usize = 2953;

#[derive(Debug, Error)]
pub enum QrsavError {
    /// A required configuration value is missing or empty
    #[error("configuration error: {0} must not be empty")]
    Configuration(&'static str),

    /// Requested algorithm or provider is not available
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Corrupt or algorithm-mismatched key bytes
    #[error("invalid key material: {0}")]
    KeyFormat(String),

    /// An expected key is absent from the store
    #[error("no key found: {0}")]
    NoKey(String),

    /// More than one signing identity for a single algorithm
    #[error("key store is corrupt: {count} private keys found for algorithm '{algorithm}'")]
    AmbiguousPrivateKey { algorithm: String, count: usize },

    /// I/O failure on a store path
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing medium missing or not usable as a store
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("payload of {size} bytes exceeds QR code capacity of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("barcode encoding failed: {0}")]
    Barcode(String),

    /// Background task panicked or was cancelled
    #[error("background task failed: {0}")]
    Worker(String),
}

impl QrsavError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller can recover by provisioning a new key pair
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::NoKey(_))
    }
}

pub type Result<T> = std::result::Result<T, QrsavError>;
