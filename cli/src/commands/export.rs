//! Export the signing identity's public key

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use base64::Engine as _;
use colored::Colorize;
use qrsav_core::crypto;

use super::open_session;
use crate::config::AppConfig;

pub fn run(config: &AppConfig, out: Option<&Path>, as_base64: bool) -> Result<()> {
    let session = open_session(config)?;

    let public = match session.store().get_private() {
        Ok(private) => private.public_key(),
        Err(e) if e.is_missing_key() => {
            bail!("No signing key found. Run 'qrsav keygen' first.");
        }
        Err(e) => return Err(e.into()),
    };
    let der = crypto::encode_public(&public)?;

    match out {
        Some(path) => {
            fs::write(path, &der)
                .with_context(|| format!("Failed to write public key to {}", path.display()))?;
            println!("{}", "Public key exported!".green().bold());
            println!("  {}", path.display());
            println!();
            println!("{}:", "Fingerprint (SHA-256)".yellow());
            println!("  {}", crypto::fingerprint(&public)?);
        }
        None if as_base64 => {
            println!("{}", base64::engine::general_purpose::STANDARD.encode(&der));
        }
        None => println!("{}", hex::encode(&der)),
    }

    Ok(())
}
