//! On-disk key store
//!
//! Layout under the store root:
//! - `keys/{id}-{algorithm}`      private key, PKCS#8 DER
//! - `keys/{id}-{algorithm}.pub`  public key, SPKI DER
//! - `codes/qrcode_{id}.jpeg`     rendered QR codes
//!
//! The algorithm tag is the configured key algorithm lower-cased. A store
//! holds at most one private key per algorithm and any number of public keys.

use chrono::Local;
use rand::Rng;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use crate::barcode::EncodedImage;
use crate::crypto::{self, KeyPair, PrivateKeyMaterial, PublicKeyMaterial};
use crate::error::{QrsavError, Result};
use crate::spec::SignatureSpec;

pub const KEY_DIR: &str = "keys";
pub const CODE_DIR: &str = "codes";
pub const PUBLIC_KEY_EXTENSION: &str = ".pub";

const CODE_PREFIX: &str = "qrcode_";
const CODE_EXTENSION: &str = ".jpeg";

/// Locale date-time layout the identity hash is taken over (`MMM d, yyyy h:mm:ss a`)
const IDENTITY_TIMESTAMP_FORMAT: &str = "%b %-d, %Y %-I:%M:%S %p";

/// A key file as recorded in the store, parsed from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredKeyRecord {
    pub id: String,
    pub is_private: bool,
    pub algorithm: String,
    pub path: PathBuf,
}

impl StoredKeyRecord {
    /// Raw stored bytes, wiped on drop
    pub fn load_bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        read_file(&self.path).map(Zeroizing::new)
    }
}

/// Handle on an opened key store
#[derive(Debug, Clone)]
pub struct KeyStore {
    root: PathBuf,
    keys_dir: PathBuf,
    codes_dir: PathBuf,
    spec: SignatureSpec,
}

impl KeyStore {
    /// Open (and on first use, lay out) the store at `root`
    ///
    /// Fails if the backing directory cannot be used.
    pub fn open(root: impl Into<PathBuf>, spec: SignatureSpec) -> Result<Self> {
        spec.validate()?;
        let root = root.into();

        if root.exists() && !root.is_dir() {
            return Err(QrsavError::StorageUnavailable(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }

        let keys_dir = root.join(KEY_DIR);
        let codes_dir = root.join(CODE_DIR);

        for dir in [&keys_dir, &codes_dir] {
            if !dir.is_dir() {
                fs::create_dir_all(dir).map_err(|e| {
                    QrsavError::StorageUnavailable(format!("cannot create '{}': {}", dir.display(), e))
                })?;
                tracing::debug!(path = %dir.display(), "created directory");
            }
        }

        Ok(Self {
            root,
            keys_dir,
            codes_dir,
            spec,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn keys_dir(&self) -> &Path {
        &self.keys_dir
    }

    pub fn codes_dir(&self) -> &Path {
        &self.codes_dir
    }

    pub fn spec(&self) -> &SignatureSpec {
        &self.spec
    }

    fn private_suffix(&self) -> String {
        format!("-{}", self.spec.storage_tag())
    }

    fn public_suffix(&self) -> String {
        format!("-{}{}", self.spec.storage_tag(), PUBLIC_KEY_EXTENSION)
    }

    /// Path of a key file for `id` under the configured algorithm
    pub fn key_path(&self, id: &str, is_private: bool) -> PathBuf {
        let suffix = if is_private {
            self.private_suffix()
        } else {
            self.public_suffix()
        };
        self.keys_dir.join(format!("{}{}", id, suffix))
    }

    /// Pick a fresh identity token
    ///
    /// Starts from a 32-bit string hash of the current local time and walks
    /// by random odd offsets until the value is positive and unused by any
    /// stored key or code. Unpredictable enough to avoid collisions, not a
    /// secret.
    pub fn generate_identity(&self) -> Result<String> {
        let mut taken = list_file_names(&self.keys_dir)?;
        taken.extend(list_file_names(&self.codes_dir)?);

        let stamp = Local::now().format(IDENTITY_TIMESTAMP_FORMAT).to_string();
        let mut id = string_hash(&stamp);
        let mut rng = rand::thread_rng();

        while id <= 0 || identity_taken(&taken, id) {
            id = id.wrapping_add((rng.gen::<u32>() | 1) as i32);
        }

        Ok(id.to_string())
    }

    /// Write a private key under `id`, replacing any existing file
    pub fn put_private(&self, id: &str, key: &PrivateKeyMaterial) -> Result<PathBuf> {
        let encoded = crypto::encode_private(key)?;
        let path = self.key_path(id, true);
        write_file(&path, &encoded, true)?;
        Ok(path)
    }

    /// Write a public key under `id`, replacing any existing file
    pub fn put_public(&self, id: &str, key: &PublicKeyMaterial) -> Result<PathBuf> {
        let encoded = crypto::encode_public(key)?;
        let path = self.key_path(id, false);
        write_file(&path, &encoded, false)?;
        Ok(path)
    }

    /// Persist both halves of a pair under a fresh identity
    pub fn save_pair(&self, pair: &KeyPair) -> Result<String> {
        let id = self.generate_identity()?;
        self.put_private(&id, &pair.private)?;
        self.put_public(&id, &pair.public)?;
        tracing::info!(id = %id, algorithm = %self.spec.key_algorithm(), "stored key pair");
        Ok(id)
    }

    /// Trust a counterparty's public key given as SPKI DER
    pub fn import_public_key(&self, der: &[u8]) -> Result<String> {
        let key = crypto::decode_public(der, &self.spec)?;
        let id = self.generate_identity()?;
        self.put_public(&id, &key)?;
        tracing::info!(id = %id, "imported public key");
        Ok(id)
    }

    /// Identity of the signing key for the configured algorithm
    ///
    /// More than one candidate means the store is corrupt and is reported
    /// rather than resolved.
    pub fn private_key_identity(&self) -> Result<Option<String>> {
        let suffix = self.private_suffix();
        let mut ids: Vec<String> = list_file_names(&self.keys_dir)?
            .into_iter()
            .filter_map(|name| name.strip_suffix(&suffix).map(str::to_string))
            .filter(|id| !id.is_empty())
            .collect();

        match ids.len() {
            0 => Ok(None),
            1 => Ok(ids.pop()),
            count => {
                tracing::warn!(count, algorithm = %self.spec.key_algorithm(), "multiple private keys in store");
                Err(QrsavError::AmbiguousPrivateKey {
                    algorithm: self.spec.storage_tag(),
                    count,
                })
            }
        }
    }

    /// Load the signing key
    pub fn get_private(&self) -> Result<PrivateKeyMaterial> {
        if list_file_names(&self.keys_dir)?.is_empty() {
            return Err(QrsavError::NoKey("key directory is empty".to_string()));
        }

        let id = self.private_key_identity()?.ok_or_else(|| {
            QrsavError::NoKey(format!("no private key for algorithm '{}'", self.spec.storage_tag()))
        })?;

        let bytes = Zeroizing::new(read_file(&self.key_path(&id, true))?);
        crypto::decode_private(&bytes, &self.spec)
    }

    /// Load one public key by identity
    pub fn get_public(&self, id: &str) -> Result<PublicKeyMaterial> {
        let path = self.key_path(id, false);
        if !path.is_file() {
            return Err(QrsavError::NoKey(format!("no public key with identity '{}'", id)));
        }
        crypto::decode_public(&read_file(&path)?, &self.spec)
    }

    /// Identities of every public key for the configured algorithm, sorted
    pub fn public_key_identities(&self) -> Result<Vec<String>> {
        let suffix = self.public_suffix();
        Ok(list_file_names(&self.keys_dir)?
            .into_iter()
            .filter_map(|name| name.strip_suffix(&suffix).map(str::to_string))
            .filter(|id| !id.is_empty())
            .collect())
    }

    /// Every stored public key for the configured algorithm
    ///
    /// Empty when none exist. Order is by file name.
    pub fn list_public_keys(&self) -> Result<Vec<PublicKeyMaterial>> {
        self.public_key_identities()?
            .iter()
            .map(|id| self.get_public(id))
            .collect()
    }

    /// Whether a signing identity is provisioned: a private key and the
    /// public key with the same identity both exist
    pub fn exists(&self) -> Result<bool> {
        match self.private_key_identity()? {
            Some(id) => Ok(self.key_path(&id, false).is_file()),
            None => Ok(false),
        }
    }

    /// Every key file in the store, across algorithms
    pub fn records(&self) -> Result<Vec<StoredKeyRecord>> {
        Ok(list_file_names(&self.keys_dir)?
            .into_iter()
            .filter_map(|name| {
                let (stem, is_private) = match name.strip_suffix(PUBLIC_KEY_EXTENSION) {
                    Some(stem) => (stem, false),
                    None => (name.as_str(), true),
                };
                let (id, algorithm) = stem.split_once('-')?;
                if id.is_empty() || algorithm.is_empty() {
                    return None;
                }
                Some(StoredKeyRecord {
                    id: id.to_string(),
                    is_private,
                    algorithm: algorithm.to_string(),
                    path: self.keys_dir.join(&name),
                })
            })
            .collect())
    }

    /// Persist a rendered QR code under a fresh identity
    pub fn save_code(&self, image: &EncodedImage) -> Result<PathBuf> {
        let id = self.generate_identity()?;
        let path = self
            .codes_dir
            .join(format!("{}{}{}", CODE_PREFIX, id, CODE_EXTENSION));
        write_file(&path, &image.jpeg, false)?;
        Ok(path)
    }
}

/// Java-compatible 32-bit string hash over UTF-16 code units
pub(crate) fn string_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

fn identity_taken(names: &[String], id: i32) -> bool {
    let key_prefix = format!("{}-", id);
    let code_name = format!("{}{}{}", CODE_PREFIX, id, CODE_EXTENSION);
    names
        .iter()
        .any(|name| name.starts_with(&key_prefix) || *name == code_name)
}

/// Regular-file names in `dir`, sorted
fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(QrsavError::StorageUnavailable(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| QrsavError::storage(dir, e))? {
        let entry = entry.map_err(|e| QrsavError::storage(dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| QrsavError::storage(path, e))?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "read file");
    Ok(bytes)
}

/// Write and fsync; private files are owner-only on Unix
fn write_file(path: &Path, bytes: &[u8], restricted: bool) -> Result<()> {
    let mut file = File::create(path).map_err(|e| QrsavError::storage(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if restricted {
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| QrsavError::storage(path, e))?;
        }
    }

    #[cfg(not(unix))]
    {
        let _ = restricted;
    }

    file.write_all(bytes).map_err(|e| QrsavError::storage(path, e))?;
    file.sync_all().map_err(|e| QrsavError::storage(path, e))?;

    tracing::debug!(path = %path.display(), len = bytes.len(), "wrote file");
    Ok(())
}
