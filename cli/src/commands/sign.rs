//! Build payload text for a QR code

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use qrsav_core::{QrsavError, SessionWorker};

use super::open_session;
use crate::config::AppConfig;

pub async fn run(config: &AppConfig, message: &str, signing: bool, out: Option<&Path>) -> Result<()> {
    let worker = SessionWorker::new(open_session(config)?);

    let payload = match worker.generate_payload(message, signing).await {
        Ok(payload) => payload,
        Err(QrsavError::PayloadTooLarge { size, limit }) => {
            anyhow::bail!(
                "Data too big: the payload is {} bytes, a QR code holds at most {}.",
                size,
                limit
            );
        }
        Err(e) => return Err(e).context("Failed to build payload"),
    };

    match out {
        Some(path) => {
            fs::write(path, payload_line(&payload))
                .with_context(|| format!("Failed to write payload to {}", path.display()))?;
            let status = if signing { "Signed" } else { "Unsigned" };
            println!(
                "{} payload ({} bytes) written to {}",
                status.green().bold(),
                payload.len(),
                path.display()
            );
        }
        None => print!("{}", payload_line(&payload)),
    }

    Ok(())
}

/// Payload as written by `sign`: the text plus one `\n`, which `verify` strips
pub(crate) fn payload_line(payload: &str) -> String {
    format!("{}\n", payload)
}
