//! Show configuration and key info

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;
use qrsav_core::{crypto, StoredKeyRecord};

use super::open_session;
use crate::config::{config_file, AppConfig};

pub fn run(config: &AppConfig) -> Result<()> {
    println!();
    println!("{}", "qrsav Configuration".yellow().bold());
    println!();

    println!("{}:", "Config File".cyan());
    let path = config_file();
    if path.exists() {
        println!("  {}", path.display());
    } else {
        println!("  {} {}", path.display(), "(not written, using defaults)".dimmed());
    }
    println!();

    let session = open_session(config)?;
    let store = session.store();

    println!("{}:", "Signature Suite".cyan());
    println!("  Key algorithm:       {}", config.key_algorithm);
    println!("  Signature algorithm: {}", config.signature_algorithm);
    println!("  Provider:            {}", config.provider);
    println!();

    println!("{}:", "Signing Identity".cyan());
    match store.private_key_identity() {
        Ok(Some(id)) if store.exists()? => {
            println!("  {} ({})", "CONFIGURED".green(), id);
            let public = store.get_public(&id)?;
            println!("  Fingerprint: {}", crypto::fingerprint(&public)?);
        }
        Ok(Some(id)) => {
            println!("  {} ({})", "PUBLIC KEY MISSING".yellow(), id);
            println!("  Run 'qrsav keygen' to restore it");
        }
        Ok(None) => {
            println!("  {}", "NOT CONFIGURED".red());
            println!("  Created on the first 'qrsav sign', or run 'qrsav keygen'");
        }
        Err(e) => {
            println!("  {} {}", "ERROR".red().bold(), e);
        }
    }
    println!();

    println!("{}:", "Trusted Public Keys".cyan());
    let identities = store.public_key_identities()?;
    if identities.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for id in identities {
        match store.get_public(&id) {
            Ok(public) => println!("  {:>11}  {}", id, crypto::fingerprint(&public)?),
            Err(e) => println!("  {:>11}  {} {}", id, "unreadable:".red(), e),
        }
    }
    println!();

    println!("{}:", "Stored Keys (all algorithms)".cyan());
    let records = store.records()?;
    if records.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for record in &records {
        println!("  {}", describe_record(record));
    }
    println!();

    println!("{}:", "File Locations".cyan());
    println!("  Keys:  {}", store.keys_dir().display());
    println!("  Codes: {}", store.codes_dir().display());

    Ok(())
}

fn describe_record(record: &StoredKeyRecord) -> String {
    let kind = if record.is_private { "private" } else { "public" };
    let modified = std::fs::metadata(&record.path)
        .and_then(|meta| meta.modified())
        .map(|time| DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| "-".to_string());

    format!(
        "{:>11}  {:<8} {:<8} {}",
        record.id, record.algorithm, kind, modified
    )
}
