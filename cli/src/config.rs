//! Configuration file for the qrsav CLI
//!
//! Settings live in `~/.qrsav/config.json`. Command-line flags override the
//! file; a missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use qrsav_core::SignatureSpec;
use serde::{Deserialize, Serialize};

/// Default directory for qrsav state
const QRSAV_DIR: &str = ".qrsav";
const CONFIG_FILE: &str = "config.json";
const DATA_DIR: &str = "data";

pub const DEFAULT_KEY_ALGORITHM: &str = "EC";
pub const DEFAULT_SIGNATURE_ALGORITHM: &str = "SHA256withECDSA";
pub const DEFAULT_PROVIDER: &str = "RustCrypto";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub key_algorithm: String,
    pub signature_algorithm: String,
    pub provider: String,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            key_algorithm: DEFAULT_KEY_ALGORITHM.to_string(),
            signature_algorithm: DEFAULT_SIGNATURE_ALGORITHM.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            data_dir: qrsav_dir().join(DATA_DIR),
        }
    }
}

/// Values given on the command line; `None` keeps the file's value
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub key_algorithm: Option<String>,
    pub signature_algorithm: Option<String>,
    pub provider: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&config_file())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_file())
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(value) = overrides.key_algorithm {
            self.key_algorithm = value;
        }
        if let Some(value) = overrides.signature_algorithm {
            self.signature_algorithm = value;
        }
        if let Some(value) = overrides.provider {
            self.provider = value;
        }
        if let Some(value) = overrides.data_dir {
            self.data_dir = value;
        }
        self
    }

    /// Fails on an empty algorithm or provider name
    pub fn to_spec(&self) -> Result<SignatureSpec> {
        let spec = SignatureSpec::new(
            self.key_algorithm.as_str(),
            self.signature_algorithm.as_str(),
            self.provider.as_str(),
        )
        .context("Invalid configuration")?;
        Ok(spec)
    }
}

/// `~/.qrsav`, or `./.qrsav` when no home directory is known
pub fn qrsav_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(QRSAV_DIR)
}

pub fn config_file() -> PathBuf {
    qrsav_dir().join(CONFIG_FILE)
}
