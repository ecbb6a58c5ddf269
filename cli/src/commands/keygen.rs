//! Key generation command

use anyhow::{bail, Context, Result};
use colored::Colorize;
use qrsav_core::crypto;

use super::open_session;
use crate::config::AppConfig;

pub fn run(config: &AppConfig) -> Result<()> {
    let session = open_session(config)?;
    let store = session.store();

    if let Some(id) = store.private_key_identity()? {
        if store.exists()? {
            bail!(
                "A {} signing key already exists (identity {}).\n\
                 Payloads signed with it can only be verified while it stays in the store.",
                session.spec().key_algorithm(),
                id
            );
        }
        println!("{}", "Public key missing for existing identity, restoring it...".yellow());
    }

    println!("{}", "=== qrsav Key Generation ===".cyan().bold());
    println!();

    let private = session.signing_key()?;
    let public = private.public_key();
    let id = store
        .private_key_identity()?
        .context("Signing identity missing after key generation")?;

    println!("{}", "Signing key ready!".green().bold());
    println!();
    println!("{}:", "Identity".yellow());
    println!("  {}", id);
    println!();
    println!("{}:", "Algorithm".yellow());
    println!("  {}", session.spec());
    println!();
    println!("{}:", "Public Key Fingerprint (SHA-256)".yellow());
    println!("  {}", crypto::fingerprint(&public)?);
    println!();
    println!(
        "{}",
        format!("Keys saved to: {}", store.keys_dir().display()).dimmed()
    );
    println!(
        "{}",
        "Share your public key with 'qrsav export' so others can verify your codes.".dimmed()
    );

    Ok(())
}
