//! Trust a counterparty's public key

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use qrsav_core::crypto;

use super::open_session;
use crate::config::AppConfig;

pub fn run(config: &AppConfig, file: &Path, is_hex: bool) -> Result<()> {
    let raw = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let der = if is_hex {
        decode_hex_key(&raw)?
    } else {
        raw
    };

    let session = open_session(config)?;
    let id = session
        .store()
        .import_public_key(&der)
        .with_context(|| format!("{} is not a {} public key", file.display(), session.spec().key_algorithm()))?;
    let public = session.store().get_public(&id)?;

    println!("{}", "Public key imported!".green().bold());
    println!();
    println!("{}:", "Identity".yellow());
    println!("  {}", id);
    println!();
    println!("{}:", "Fingerprint (SHA-256)".yellow());
    println!("  {}", crypto::fingerprint(&public)?);
    println!();
    println!(
        "{}",
        "Codes signed with this key will now verify on scan.".dimmed()
    );

    Ok(())
}

/// Hex text, whitespace ignored
pub(crate) fn decode_hex_key(raw: &[u8]) -> Result<Vec<u8>> {
    let text: String = String::from_utf8_lossy(raw)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    hex::decode(&text).context("Key file is not valid hex")
}
