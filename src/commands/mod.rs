pub mod analyze;
pub mod preview;

use crate::config::Settings;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leaf-lens")]
#[command(about = "Plant disease detection from a leaf or stem photo")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Classification endpoint (overrides config)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload an image and print the diagnosis
    Analyze {
        /// Path to the plant image
        file: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the preview data URL of an image
    Preview {
        /// Path to the plant image
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout_secs = timeout;
        }
    }
}

pub async fn dispatch(cli: Cli) -> Result<(), AppError> {
    let mut settings = Settings::load()?;
    cli.apply_overrides(&mut settings);

    match &cli.command {
        Commands::Analyze { file, json } => analyze::analyze(&settings, file, *json).await,
        Commands::Preview { file, out } => preview::preview(&settings, file, out.as_deref()).await,
    }
}
