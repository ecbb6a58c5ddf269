//! Verify scanned payload text

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use qrsav_core::{ScanReport, SessionWorker, VerificationOutcome};

use super::open_session;
use crate::config::AppConfig;

pub async fn run(
    config: &AppConfig,
    text: Option<String>,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let scanned = read_scanned_text(text, file)?;
    if scanned.is_empty() {
        bail!("No code found: the scanned text is empty.");
    }

    let worker = SessionWorker::new(open_session(config)?);
    let report = worker.process_scanned_text(scanned).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

pub(crate) fn read_scanned_text(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scanned text from {}", path.display()))?;
        return Ok(strip_line_ending(text));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read scanned text from stdin")?;
    Ok(strip_line_ending(buffer))
}

/// Drop the single `\n` that ends a line of `sign` output
///
/// Only `\n` is removed: a trailing `\r` may be the last signature byte.
pub(crate) fn strip_line_ending(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

pub(crate) fn print_report(report: &ScanReport) {
    match report.outcome {
        VerificationOutcome::Verified => {
            println!("{}", "Signature verified".green().bold());
        }
        VerificationOutcome::NoSignaturePresent => {
            println!("{}", "No signature".yellow().bold());
        }
        VerificationOutcome::Failed => {
            println!("{}", "Verification FAILED".red().bold());
            println!("{}", "The content was withheld: it does not match any trusted key.".red());
        }
        VerificationOutcome::NoKeyAvailable => {
            println!("{}", "No public key available".red().bold());
            println!("{}", "Import the signer's key with 'qrsav import' first.".dimmed());
        }
    }

    if !report.display_text.is_empty() {
        println!();
        println!("{}", report.display_text);
    }
}
