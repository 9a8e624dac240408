//! audioleaf - Extract readable text from documents and convert between
//! PDF and Word.
//!
//! # Configuration
//!
//! Settings come from `--config <path>` (or `~/.audioleaf/config.toml` when
//! present), overlaid by `AUDIOLEAF_*` environment variables. A `.env`
//! file in the working directory is loaded first.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audioleaf_core::AudioleafConfig;

mod commands;

use commands::{ConvertCommand, ExtractCommand};

#[derive(Parser)]
#[command(
    name = "audioleaf",
    version,
    about = "Document text extraction and format conversion",
    after_help = "EXAMPLES:\n  \
                  audioleaf extract lecture.pdf\n  \
                  audioleaf extract notes.docx --json > notes.json\n  \
                  audioleaf convert lecture.pdf --to word --out converted/\n  \
                  audioleaf config"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF or Word document
    Extract(ExtractCommand),

    /// Convert a PDF to Word or a Word document to PDF
    Convert(ConvertCommand),

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries extracted text and JSON.
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Extract(cmd) => cmd.execute(config).await,
        Commands::Convert(cmd) => cmd.execute(config).await,
        Commands::Config => print_config(&config),
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<AudioleafConfig> {
    let path = explicit.or_else(|| {
        let default = AudioleafConfig::default_path();
        default.exists().then_some(default)
    });

    if let Some(path) = &path {
        tracing::debug!(path = %path.display(), "Loading configuration");
    }
    AudioleafConfig::load(path.as_deref())
        .with_context(|| match &path {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Invalid configuration".to_string(),
        })
}

fn print_config(config: &AudioleafConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{rendered}");
    println!(
        "# conversion api key: {}",
        if config.conversion.api_key.is_some() {
            "set (remote backend)"
        } else {
            "not set (synthetic backend)"
        }
    );
    Ok(())
}
