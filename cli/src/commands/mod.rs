pub mod export;
pub mod import;
pub mod info;
pub mod init;
pub mod keygen;
pub mod sign;
pub mod verify;

use anyhow::{Context, Result};
use qrsav_core::Session;

use crate::config::AppConfig;

/// Open the key store named by the configuration
pub(crate) fn open_session(config: &AppConfig) -> Result<Session> {
    let spec = config.to_spec()?;
    Session::open(&config.data_dir, spec)
        .with_context(|| format!("Failed to open key store at {}", config.data_dir.display()))
}
