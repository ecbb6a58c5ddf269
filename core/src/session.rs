//! Generate and scan flows over one opened store
//!
//! A [`Session`] is constructed explicitly at start-up and passed to whatever
//! needs it; there is no process-wide instance.

use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;

use crate::barcode::{BarcodeCodec, EncodedImage};
use crate::crypto::{KeyPair, KeyPairGenerator, PrivateKeyMaterial, SignatureEngine};
use crate::error::{QrsavError, Result, PAYLOAD_CAPACITY_BYTES};
use crate::policy::{self, VerificationOutcome};
use crate::spec::SignatureSpec;
use crate::store::KeyStore;

/// What to show the user after a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub outcome: VerificationOutcome,
    /// Empty when a signature was present and did not verify
    pub display_text: String,
}

pub struct Session {
    store: KeyStore,
    engine: SignatureEngine,
    generator: KeyPairGenerator,
    /// Serializes first-use key provisioning
    provisioning: Mutex<()>,
}

impl Session {
    /// Resolve the signature suite and open the store; fails fast on either
    pub fn open(root: impl Into<PathBuf>, spec: SignatureSpec) -> Result<Self> {
        let engine = SignatureEngine::new(&spec)?;
        let generator = KeyPairGenerator::new(&spec)?;
        let store = KeyStore::open(root, spec)?;

        Ok(Self {
            store,
            engine,
            generator,
            provisioning: Mutex::new(()),
        })
    }

    pub fn spec(&self) -> &SignatureSpec {
        self.store.spec()
    }

    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    pub fn engine(&self) -> &SignatureEngine {
        &self.engine
    }

    /// The signing key, generating and persisting a pair on first use
    ///
    /// A private key whose public half went missing gets the public file
    /// rewritten instead of a second identity.
    pub fn signing_key(&self) -> Result<PrivateKeyMaterial> {
        let _guard = self.provisioning.lock();

        match self.load_or_generate()? {
            (private, Some(pair)) => {
                self.persist(&pair)?;
                Ok(private)
            }
            (private, None) => Ok(private),
        }
    }

    /// The stored signing key, or a fresh pair that is not yet persisted
    ///
    /// Callers hold the provisioning lock.
    fn load_or_generate(&self) -> Result<(PrivateKeyMaterial, Option<KeyPair>)> {
        if self.store.exists()? {
            return Ok((self.store.get_private()?, None));
        }

        if let Some(id) = self.store.private_key_identity()? {
            let private = self.store.get_private()?;
            tracing::warn!(id = %id, "public key missing for signing identity, restoring it");
            self.store.put_public(&id, &private.public_key())?;
            return Ok((private, None));
        }

        let pair = self.generator.generate();
        Ok((pair.private.clone(), Some(pair)))
    }

    fn persist(&self, pair: &KeyPair) -> Result<()> {
        let id = self.store.save_pair(pair)?;
        tracing::info!(id = %id, "provisioned signing identity");
        Ok(())
    }

    /// Sign `message` and frame it for barcode encoding
    pub fn generate_signed_payload(&self, message: &str) -> Result<String> {
        self.generate_payload(message, true)
    }

    /// Build payload text, optionally signed
    ///
    /// A first-use key pair is stored only once the signed payload fits in a
    /// QR code.
    pub fn generate_payload(&self, message: &str, signing: bool) -> Result<String> {
        if message.is_empty() {
            return Err(QrsavError::EmptyMessage);
        }

        if !signing {
            check_capacity(message)?;
            tracing::debug!(bytes = message.len(), signed = false, "generated payload");
            return Ok(message.to_string());
        }

        let _guard = self.provisioning.lock();
        let (key, pending) = self.load_or_generate()?;
        let signature = self.engine.sign(message.as_bytes(), &key)?;
        let payload = self.engine.frame(message, &signature);
        check_capacity(&payload)?;

        if let Some(pair) = pending {
            self.persist(&pair)?;
        }

        tracing::debug!(bytes = payload.len(), signed = true, "generated payload");
        Ok(payload)
    }

    /// Split, verify against every stored public key, and decide what to show
    ///
    /// Never fails: problems reading candidate keys count as a failed
    /// verification so the user always gets an answer.
    pub fn process_scanned_text(&self, text: &str) -> ScanReport {
        let payload = self.engine.get_content(text);

        if !payload.is_signed() {
            tracing::info!(outcome = %VerificationOutcome::NoSignaturePresent, "scan processed");
            return ScanReport {
                outcome: VerificationOutcome::NoSignaturePresent,
                display_text: payload.into_message(),
            };
        }

        let outcome = match self.store.list_public_keys() {
            Ok(candidates) => policy::evaluate(&self.engine, &payload, &candidates),
            Err(e) => {
                tracing::warn!(error = %e, "cannot load candidate public keys");
                VerificationOutcome::Failed
            }
        };

        tracing::info!(outcome = %outcome, "scan processed");
        let display_text = if outcome.is_verified() {
            payload.into_message()
        } else {
            String::new()
        };

        ScanReport {
            outcome,
            display_text,
        }
    }

    /// Encode a payload with `codec` and keep the image under `codes/`
    pub fn render_code<C: BarcodeCodec + ?Sized>(
        &self,
        codec: &C,
        payload: &str,
        size: u32,
    ) -> Result<(EncodedImage, PathBuf)> {
        let image = codec.encode(payload, size)?;
        let path = self.store.save_code(&image)?;
        Ok((image, path))
    }

    /// Decode an image and process its text; `None` when no code is found
    pub fn scan_code<C: BarcodeCodec + ?Sized>(
        &self,
        codec: &C,
        image: &EncodedImage,
    ) -> Option<ScanReport> {
        match codec.decode(image) {
            Some(text) if !text.is_empty() => Some(self.process_scanned_text(&text)),
            _ => {
                tracing::debug!("no code found");
                None
            }
        }
    }
}

fn check_capacity(payload: &str) -> Result<()> {
    if payload.len() > PAYLOAD_CAPACITY_BYTES {
        return Err(QrsavError::PayloadTooLarge {
            size: payload.len(),
            limit: PAYLOAD_CAPACITY_BYTES,
        });
    }
    Ok(())
}
