//! qrsav CLI - sign QR code payloads and verify scanned ones

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

#[cfg(test)]
mod tests;

use commands::*;
use config::{AppConfig, Overrides};

#[derive(Parser)]
#[command(name = "qrsav")]
#[command(version = "0.1.0")]
#[command(about = "Signed QR code payloads - sign on generate, verify on scan")]
#[command(long_about = r#"
qrsav appends a digital signature to the text carried by a QR code and
checks it again when the code is scanned.

The signature rides inside the payload itself, so any reader still shows
the message. A qrsav reader also tells you whether the message was signed
by a key you trust.

Quick Start:
  1. qrsav init                  Write the config and create the key store
  2. qrsav sign "hello"          Sign a message (creates your key on first use)
  3. qrsav export --out my.der   Share your public key
  4. qrsav import their.der      Trust someone else's key
  5. qrsav verify --file code.txt
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Key algorithm (EC, Ed25519)
    #[arg(long, global = true)]
    key_algorithm: Option<String>,

    /// Signature algorithm (SHA256withECDSA, Ed25519)
    #[arg(long, global = true)]
    signature_algorithm: Option<String>,

    /// Crypto provider (RustCrypto, BC)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Directory holding keys/ and codes/
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the configuration file and create the key store
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Create the signing identity for the configured algorithm
    Keygen,

    /// Build the payload text for a QR code
    Sign {
        /// Message to carry in the code
        message: String,

        /// Leave the message unsigned
        #[arg(long)]
        no_sign: bool,

        /// Write the payload to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Verify scanned payload text against the trusted public keys
    Verify {
        /// Scanned text (reads stdin when neither TEXT nor --file is given)
        text: Option<String>,

        /// Read the scanned text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Trust a public key (DER SubjectPublicKeyInfo)
    Import {
        /// Key file
        file: PathBuf,

        /// File holds hex text instead of raw DER
        #[arg(long)]
        hex: bool,
    },

    /// Export your public key (DER SubjectPublicKeyInfo)
    Export {
        /// Write raw DER to a file instead of printing it
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print base64 instead of hex
        #[arg(long)]
        base64: bool,
    },

    /// Show configuration and key info
    Info,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(overrides: Overrides) -> Result<AppConfig> {
    let config = AppConfig::load()?.merge(overrides);
    tracing::debug!(data_dir = %config.data_dir.display(), "loaded configuration");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = Overrides {
        key_algorithm: cli.key_algorithm,
        signature_algorithm: cli.signature_algorithm,
        provider: cli.provider,
        data_dir: cli.data_dir,
    };

    match cli.command {
        Commands::Init { force } => {
            init::run(overrides, force)?;
        }
        Commands::Keygen => {
            keygen::run(&load_config(overrides)?)?;
        }
        Commands::Sign { message, no_sign, out } => {
            sign::run(&load_config(overrides)?, &message, !no_sign, out.as_deref()).await?;
        }
        Commands::Verify { text, file, json } => {
            verify::run(&load_config(overrides)?, text, file.as_deref(), json).await?;
        }
        Commands::Import { file, hex } => {
            import::run(&load_config(overrides)?, &file, hex)?;
        }
        Commands::Export { out, base64 } => {
            export::run(&load_config(overrides)?, out.as_deref(), base64)?;
        }
        Commands::Info => {
            info::run(&load_config(overrides)?)?;
        }
    }

    Ok(())
}
