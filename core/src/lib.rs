//! qrsav core - signed QR code payloads
//!
//! Embeds a digital signature into QR code text and verifies it on scan:
//! - key generation, storage codec and on-disk key store
//! - signing, verification and the delimiter-free payload framing
//! - the verification policy that turns a scan into an outcome
//!
//! Generate path: [`SignatureSpec`] -> [`KeyPairGenerator`] -> [`KeyStore`]
//! -> [`SignatureEngine::sign`] -> payload text -> barcode encoder.
//!
//! Scan path: barcode decoder -> text -> [`SignatureEngine::get_content`]
//! -> [`policy::evaluate`] over the stored public keys -> [`VerificationOutcome`].

pub mod barcode;
pub mod crypto;
pub mod error;
pub mod framing;
pub mod policy;
pub mod session;
pub mod spec;
pub mod store;
pub mod worker;

pub use barcode::{BarcodeCodec, EncodedImage};
pub use crypto::{
    KeyPair, KeyPairGenerator, PrivateKeyMaterial, PublicKeyMaterial, SignatureEngine,
    SignatureEntity,
};
pub use error::{QrsavError, Result, PAYLOAD_CAPACITY_BYTES};
pub use framing::SignedPayload;
pub use policy::VerificationOutcome;
pub use session::{ScanReport, Session};
pub use spec::{CipherSuite, KeyAlgorithm, SignatureAlgorithm, SignatureSpec};
pub use store::{KeyStore, StoredKeyRecord};
pub use worker::SessionWorker;


#[cfg(test)]
mod test_vectors;
