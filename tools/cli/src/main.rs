//! ScholarVault CLI - operator tooling for encrypted settings.
//!
//! Generates master keys, checks whether the current environment can
//! encrypt, and encrypts or decrypts single values using the same
//! configuration the application reads.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use zeroize::Zeroizing;

use scholarvault_settings::{
    EncryptionService, Envelope, PayloadClass, SettingsConfig, MASTER_KEY_ENV,
};

#[derive(Parser)]
#[command(name = "scholarvault")]
#[command(about = "ScholarVault - Encrypted settings tooling")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new master key to install as ENCRYPTION_MASTER_KEY.
    GenerateKey,

    /// Check whether the environment can encrypt settings.
    Validate {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Encrypt a value and print its envelope as JSON.
    Encrypt {
        /// Kind of value.
        #[arg(short, long, value_enum, default_value = "setting")]
        class: ClassArg,

        /// Value to encrypt (prompted for without echo when omitted).
        #[arg(short, long)]
        value: Option<String>,
    },

    /// Decrypt an envelope and print the plaintext.
    Decrypt {
        /// Kind of value.
        #[arg(short, long, value_enum, default_value = "setting")]
        class: ClassArg,

        /// File holding the envelope JSON (stdin when omitted).
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    ApiKey,
    Setting,
}

impl From<ClassArg> for PayloadClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::ApiKey => PayloadClass::ApiKey,
            ClassArg::Setting => PayloadClass::Setting,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::GenerateKey => cmd_generate_key(),
        Commands::Validate { json } => cmd_validate(json),
        Commands::Encrypt { class, value } => cmd_encrypt(class.into(), value).await,
        Commands::Decrypt { class, input } => cmd_decrypt(class.into(), input).await,
    }
}

/// Build the service from the process environment.
fn load_service() -> Result<EncryptionService> {
    let config = SettingsConfig::from_env().context("Failed to load configuration")?;
    info!("Loaded configuration for {} deployment", config.mode);
    Ok(EncryptionService::from_config(config))
}

/// Print a freshly generated master key.
fn cmd_generate_key() -> Result<()> {
    let key = Zeroizing::new(EncryptionService::generate_master_key());

    println!("{}", key.as_str());
    eprintln!("Install this value as {} and keep it secret.", MASTER_KEY_ENV);

    Ok(())
}

/// Validate the environment.
fn cmd_validate(json: bool) -> Result<()> {
    let service = load_service()?;
    let report = service.validate_environment();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        println!("Mode: {}", service.provider().mode());
        println!("Valid: {}", if report.valid { "yes" } else { "no" });
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }
    }

    if !report.valid {
        anyhow::bail!("Environment cannot encrypt settings safely");
    }

    Ok(())
}

/// Encrypt one value.
async fn cmd_encrypt(class: PayloadClass, value: Option<String>) -> Result<()> {
    let service = load_service()?;

    let plaintext = match value {
        Some(value) => Zeroizing::new(value),
        None => Zeroizing::new(
            rpassword::prompt_password(format!("Enter {} to encrypt: ", class))
                .context("Failed to read value")?,
        ),
    };

    let envelope = service
        .encrypt_offloaded(class, plaintext.as_str().to_owned())
        .await
        .context("Failed to encrypt value")?;

    println!("{}", envelope.to_json_pretty()?);

    Ok(())
}

/// Decrypt one envelope.
async fn cmd_decrypt(class: PayloadClass, input: Option<PathBuf>) -> Result<()> {
    let service = load_service()?;

    let json = match input {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read envelope from stdin")?;
            buf
        }
    };

    let envelope = Envelope::from_json(json.trim()).context("Invalid envelope JSON")?;
    let plaintext = Zeroizing::new(
        service
            .decrypt_offloaded(class, envelope)
            .await
            .context("Failed to decrypt value")?,
    );

    println!("{}", plaintext.as_str());

    Ok(())
}
