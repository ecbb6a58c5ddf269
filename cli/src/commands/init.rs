//! Write the configuration file and create the key store

use anyhow::{bail, Result};
use colored::Colorize;

use super::open_session;
use crate::config::{config_file, AppConfig, Overrides};

pub fn run(overrides: Overrides, force: bool) -> Result<()> {
    let path = config_file();
    if path.exists() && !force {
        bail!(
            "Configuration already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    // Existing values survive a forced re-init unless overridden
    let config = AppConfig::load()?.merge(overrides);
    let session = open_session(&config)?;
    config.save()?;

    println!("{}", "=== qrsav Setup ===".cyan().bold());
    println!();
    println!("{}:", "Configuration".yellow());
    println!("  {}", path.display());
    println!();
    println!("{}:", "Signature Suite".yellow());
    println!("  {}", session.spec());
    println!();
    println!("{}:", "Key Store".yellow());
    println!("  Keys:  {}", session.store().keys_dir().display());
    println!("  Codes: {}", session.store().codes_dir().display());
    println!();
    println!(
        "{}",
        "Your signing key is created on the first 'qrsav sign' (or run 'qrsav keygen')."
            .dimmed()
    );

    Ok(())
}
